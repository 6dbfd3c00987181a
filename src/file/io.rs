//! Big-endian byte order reading and writing utilities for class file structures.
//!
//! The class file format stores every multi-byte quantity in big-endian order. This module
//! provides the [`crate::file::io::ByteIO`] trait together with bounds-checked helpers for
//! reading primitive values out of byte slices and writing them into any [`std::io::Write`]
//! sink.
//!
//! # Key Components
//!
//! - [`crate::file::io::ByteIO`] - Endian-aware conversion between primitives and byte arrays
//! - [`crate::file::io::read_be`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_be_at`] - Read a value at an offset, advancing the offset
//! - [`crate::file::io::write_be`] - Append a value to a byte sink
//!
//! # Error Handling
//!
//! Reads return [`crate::Error::TruncatedInput`] when the buffer holds fewer bytes than the
//! requested type, and never advance the offset in that case. Writes surface sink failures as
//! [`crate::Error::Io`].
//!
//! # Examples
//!
//! ```rust
//! use classpool::file::io::{read_be_at, write_be};
//!
//! let mut out = Vec::new();
//! write_be(&mut out, 20u8)?;
//! write_be(&mut out, 0x0102u16)?;
//!
//! let mut offset = 0;
//! let tag: u8 = read_be_at(&out, &mut offset)?;
//! let index: u16 = read_be_at(&out, &mut offset)?;
//! assert_eq!((tag, index, offset), (20, 0x0102, 3));
//! # Ok::<(), classpool::Error>(())
//! ```

use std::io::Write;

use crate::{Error, Result};

/// Trait for implementing type-specific binary conversions.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `i32`).
pub trait ByteIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Write T into a byte array in big-endian
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_byte_io {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ByteIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_byte_io!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Safely reads a value of type `T` in big-endian byte order from the start of a buffer.
///
/// # Errors
/// Returns [`crate::Error::TruncatedInput`] if there are insufficient bytes.
pub fn read_be<T: ByteIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Safely reads a value of type `T` in big-endian byte order at a specific offset.
///
/// On success the offset is advanced by the size of `T`; on failure it is left untouched.
///
/// # Errors
/// Returns [`crate::Error::TruncatedInput`] if there are insufficient bytes.
pub fn read_be_at<T: ByteIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let truncated = || Error::TruncatedInput {
        offset: *offset,
        needed: type_len,
        remaining: data.len().saturating_sub(*offset),
    };

    let Some(end) = offset.checked_add(type_len).filter(|end| *end <= data.len()) else {
        return Err(truncated());
    };
    let Ok(read) = data[*offset..end].try_into() else {
        return Err(truncated());
    };

    *offset = end;

    Ok(T::from_be_bytes(read))
}

/// Appends a value of type `T` in big-endian byte order to a byte sink.
///
/// # Errors
/// Returns [`crate::Error::Io`] if the sink rejects the write.
pub fn write_be<T: ByteIO, W: Write + ?Sized>(out: &mut W, value: T) -> Result<()> {
    out.write_all(value.to_be_bytes().as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_be_u16() {
        let result = read_be::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102);
    }

    #[test]
    fn read_be_i64() {
        let result = read_be::<i64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102_0304_0506_0708);
    }

    #[test]
    fn read_be_f32_bits() {
        let data = 1.5f32.to_bits().to_be_bytes();
        let result = read_be::<f32>(&data).unwrap();
        assert_eq!(result, 1.5);
    }

    #[test]
    fn read_be_at_advances() {
        let mut offset = 1;
        let value: u16 = read_be_at(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(value, 0x0203);
        assert_eq!(offset, 3);
    }

    #[test]
    fn read_be_at_truncated() {
        let mut offset = 7;
        let result = read_be_at::<u16>(&TEST_BUFFER, &mut offset);
        assert!(matches!(
            result,
            Err(Error::TruncatedInput {
                offset: 7,
                needed: 2,
                remaining: 1
            })
        ));
        assert_eq!(offset, 7);
    }

    #[test]
    fn read_be_at_past_end() {
        let mut offset = 12;
        let result = read_be_at::<u8>(&TEST_BUFFER, &mut offset);
        assert!(matches!(
            result,
            Err(Error::TruncatedInput { remaining: 0, .. })
        ));
    }

    #[test]
    fn read_be_at_offset_overflow() {
        let mut offset = usize::MAX;
        let result = read_be_at::<u32>(&TEST_BUFFER, &mut offset);
        assert!(matches!(
            result,
            Err(Error::TruncatedInput {
                needed: 4,
                remaining: 0,
                ..
            })
        ));
        assert_eq!(offset, usize::MAX);
    }

    #[test]
    fn write_be_appends() {
        let mut out = Vec::new();
        write_be(&mut out, 0x14u8).unwrap();
        write_be(&mut out, 0x0A0Bu16).unwrap();
        write_be(&mut out, -2i32).unwrap();
        assert_eq!(out, [0x14, 0x0A, 0x0B, 0xFF, 0xFF, 0xFF, 0xFE]);
    }
}
