//! Cursor-based byte source for constant pool decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a bounds-checked cursor over
//! an in-memory byte slice. Record decoders pull their fixed-width fields from it in big-endian
//! order; the pool decoder uses [`crate::file::parser::Parser::transactional`] so that a record
//! which fails half-way leaves the cursor where the record started.
//!
//! # Usage Examples
//!
//! ```rust
//! use classpool::Parser;
//!
//! let data = [0x14, 0x00, 0x05];
//! let mut parser = Parser::new(&data);
//!
//! let tag = parser.read_be::<u8>()?;
//! let name_index = parser.read_be::<u16>()?;
//! assert_eq!((tag, name_index), (20, 5));
//! assert!(!parser.has_more_data());
//! # Ok::<(), classpool::Error>(())
//! ```

use crate::{
    file::io::{read_be_at, ByteIO},
    Error, Result,
};

/// A generic binary data parser for reading class file structures.
///
/// The parser maintains an internal position cursor and provides bounds checking
/// to prevent buffer overruns when reading malformed or truncated data.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there are unread bytes left.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the cursor to an absolute position.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if `pos` lies past the end of the data.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::TruncatedInput {
                offset: self.position,
                needed: pos - self.position.min(pos),
                remaining: self.remaining(),
            });
        }

        self.position = pos;
        Ok(())
    }

    /// Returns the current position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Fails unless at least `needed` bytes remain.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer bytes remain.
    pub fn ensure_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(Error::TruncatedInput {
                offset: self.position,
                needed,
                remaining: self.remaining(),
            });
        }

        Ok(())
    }

    /// Read a value of type `T` in big-endian order and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if not enough data remains.
    pub fn read_be<T: ByteIO>(&mut self) -> Result<T> {
        read_be_at::<T>(self.data, &mut self.position)
    }

    /// Read `length` raw bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if not enough data remains.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        self.ensure_remaining(length)?;

        let bytes = &self.data[self.position..self.position + length];
        self.position += length;
        Ok(bytes)
    }

    /// Runs `f` and restores the cursor position if it fails.
    ///
    /// # Errors
    /// Returns whatever error `f` produced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use classpool::Parser;
    ///
    /// let mut parser = Parser::new(&[0x01]);
    /// let result: classpool::Result<u32> = parser.transactional(|p| p.read_be());
    /// assert!(result.is_err());
    /// assert_eq!(parser.pos(), 0);
    /// ```
    pub fn transactional<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let saved_position = self.position;
        let result = f(self);
        if result.is_err() {
            self.position = saved_position;
        }
        result
    }
}
