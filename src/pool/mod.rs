//! # Constant Pool
//!
//! [`ConstantPool`] is the ordered, 1-indexed table of [`Constant`] records of one class file.
//! Slot 0 is reserved, and every `CONSTANT_Long` or `CONSTANT_Double` is followed by one
//! unusable slot. Insertion order is the on-disk order.
//!
//! # Resolution
//!
//! Decoding never checks cross references, so forward and self references decode fine. A
//! reference is validated when it is followed:
//!
//! - [`ConstantPool::get`] and [`ConstantPool::get_as`] fail with [`Error::TagMismatch`] when the
//!   caller asked for the wrong kind
//! - record resolvers such as [`crate::ConstantPackage::resolve`] fail with
//!   [`Error::WrongReferencedTag`] when the record points at the wrong kind
//! - both fail with [`Error::IndexOutOfRange`] for slot 0, slots past the end, and the slot
//!   after a wide entry
//!
//! [`ConstantPool::validate`] follows every reference of every record at once.
//!
//! # Examples
//!
//! ```rust
//! use classpool::prelude::*;
//!
//! // constant_pool_count = 3, Utf8 "foo", Package -> #1
//! let data = [0x00, 0x03, 0x01, 0x00, 0x03, b'f', b'o', b'o', 0x14, 0x00, 0x01];
//! let pool = ConstantPool::parse(&data)?;
//!
//! let package = pool.get_as::<ConstantPackage>(2)?;
//! assert_eq!(package.resolve(&pool)?, "foo");
//! assert_eq!(pool.to_bytes()?, data);
//! # Ok::<(), classpool::Error>(())
//! ```
use std::{fmt, io::Write};

use tracing::{debug, trace};

use crate::{
    constants::{
        Constant, ConstantClass, ConstantNameAndType, ConstantTag, ConstantUtf8, ConstantVisitor,
        PoolEntry,
    },
    file::{io::write_be, parser::Parser},
    Error, Result,
};

mod builder;
mod config;
mod validation;

pub use builder::PoolBuilder;
pub use config::PoolConfig;

/// The largest number of slots a class file can declare, as `constant_pool_count` is a `u16`
/// that counts the reserved slot 0.
pub const MAX_SLOTS: usize = u16::MAX as usize - 1;

/// An ordered table of constant pool records.
///
/// The pool owns its records. Lookups borrow from it, so it can be shared across threads for
/// reading once it is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstantPool {
    /// Slot 0 and the followers of wide entries are `None`
    slots: Vec<Option<Constant>>,
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        ConstantPool { slots: vec![None] }
    }

    /// Creates an empty pool with room for `slots` slots.
    #[must_use]
    pub fn with_capacity(slots: usize) -> Self {
        let mut pool = Vec::with_capacity(slots + 1);
        pool.push(None);
        ConstantPool { slots: pool }
    }

    /// Reads a class-file framed pool using the default [`PoolConfig`].
    ///
    /// The input starts with the `u16 constant_pool_count`. Bytes after the last record are
    /// left unread.
    ///
    /// # Errors
    /// See [`ConstantPool::read`].
    pub fn parse(data: &[u8]) -> Result<ConstantPool> {
        Self::parse_with(data, &PoolConfig::default())
    }

    /// Reads a class-file framed pool using the given limits.
    ///
    /// # Errors
    /// See [`ConstantPool::read`].
    pub fn parse_with(data: &[u8], config: &PoolConfig) -> Result<ConstantPool> {
        let mut parser = Parser::new(data);
        Self::read(&mut parser, config)
    }

    /// Reads a `u16 constant_pool_count` followed by records until the declared slot count is
    /// reached.
    ///
    /// # Errors
    /// - [`Error::TruncatedInput`] if the count itself is cut short
    /// - [`Error::MalformedRecord`] for a count of 0 when [`PoolConfig::allow_empty`] is unset
    /// - [`Error::LimitExceeded`] if the declared slot count exceeds [`PoolConfig::max_slots`]
    /// - [`Error::Decode`] wrapping the first record failure, including a wide record that
    ///   would overrun the declared count
    pub fn read(parser: &mut Parser, config: &PoolConfig) -> Result<ConstantPool> {
        let start = parser.pos();
        let count = parser.read_be::<u16>()?;
        let declared = match count {
            0 if config.allow_empty => 0,
            0 => return Err(malformed_error!("constant_pool_count of 0 at offset {}", start)),
            n => usize::from(n) - 1,
        };

        if declared > config.max_slots {
            return Err(Error::LimitExceeded {
                declared,
                limit: config.max_slots,
            });
        }

        debug!(slots = declared, offset = start, "Reading constant pool");

        let mut pool = ConstantPool::with_capacity(declared);
        while pool.len() < declared {
            pool.decode_record(parser, Some(declared))?;
        }

        debug!(
            slots = declared,
            bytes = parser.pos() - start,
            "Constant pool read"
        );
        Ok(pool)
    }

    /// Number of slots, excluding the reserved slot 0 and including wide followers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - 1
    }

    /// Returns `true` if the pool holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a record and returns its 1-based index.
    ///
    /// `CONSTANT_Long` and `CONSTANT_Double` also reserve the next slot.
    ///
    /// # Errors
    /// Returns [`Error::PoolOverflow`] if the record would not fit in [`MAX_SLOTS`].
    pub fn insert(&mut self, constant: impl Into<Constant>) -> Result<u16> {
        let constant = constant.into();
        let width = constant.tag().slots();
        if self.len() + width > MAX_SLOTS {
            return Err(Error::PoolOverflow);
        }

        let index = u16::try_from(self.slots.len()).map_err(|_| Error::PoolOverflow)?;
        self.slots.push(Some(constant));
        if width == 2 {
            self.slots.push(None);
        }

        Ok(index)
    }

    /// Returns the record in a live slot, whatever its kind.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `index` is not a live slot.
    pub fn constant(&self, index: u16) -> Result<&Constant> {
        self.slots
            .get(usize::from(index))
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::IndexOutOfRange {
                index,
                size: self.len(),
            })
    }

    /// Returns the record at `index`, which must be of kind `expected`.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `index` is not a live slot, or
    /// [`Error::TagMismatch`] if the slot holds another kind.
    pub fn get(&self, index: u16, expected: ConstantTag) -> Result<&Constant> {
        let constant = self.constant(index)?;
        if constant.tag() != expected {
            return Err(Error::TagMismatch {
                index,
                expected,
                found: constant.tag(),
            });
        }

        Ok(constant)
    }

    /// Returns the record at `index` as the concrete type `T`.
    ///
    /// # Errors
    /// Same as [`ConstantPool::get`] with `T::TAG`.
    pub fn get_as<T: PoolEntry>(&self, index: u16) -> Result<&T> {
        let constant = self.constant(index)?;
        T::from_constant(constant).ok_or_else(|| Error::TagMismatch {
            index,
            expected: T::TAG,
            found: constant.tag(),
        })
    }

    /// Returns the record at `index` for in-place editing of its index fields.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `index` is not a live slot.
    pub fn get_mut(&mut self, index: u16) -> Result<&mut Constant> {
        let size = self.len();
        self.slots
            .get_mut(usize::from(index))
            .and_then(Option::as_mut)
            .ok_or(Error::IndexOutOfRange { index, size })
    }

    /// Returns the record at `index` as the concrete type `T`, mutably.
    ///
    /// # Errors
    /// Same as [`ConstantPool::get_as`].
    pub fn get_as_mut<T: PoolEntry>(&mut self, index: u16) -> Result<&mut T> {
        let found = self.constant(index)?.tag();
        self.get_mut(index)?
            .as_entry_mut::<T>()
            .ok_or(Error::TagMismatch {
                index,
                expected: T::TAG,
                found,
            })
    }

    /// Follows a reference held by a record of kind `referrer`.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `index` is not a live slot, or
    /// [`Error::WrongReferencedTag`] if the slot is not a `T`.
    pub fn resolve<T: PoolEntry>(&self, referrer: ConstantTag, index: u16) -> Result<&T> {
        let constant = self.constant(index)?;
        T::from_constant(constant).ok_or_else(|| Error::WrongReferencedTag {
            referrer,
            index,
            expected: T::TAG,
            found: constant.tag(),
        })
    }

    /// Follows a reference to a `CONSTANT_Utf8` and returns its text.
    ///
    /// # Errors
    /// Same as [`ConstantPool::resolve`], or [`Error::MalformedRecord`] if the payload is not
    /// valid modified UTF-8.
    pub fn resolve_utf8(&self, referrer: ConstantTag, index: u16) -> Result<&str> {
        self.resolve::<ConstantUtf8>(referrer, index)
            .and_then(ConstantUtf8::value)
    }

    /// Decodes `count` tagged records and appends them.
    ///
    /// Each record is decoded completely before it is inserted. On failure the failing record
    /// is not inserted, records decoded before it stay in the pool, and the parser is left at
    /// the failing record's tag byte.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] carrying the slot and offset of the failing record and
    /// [`Error::TruncatedInput`], [`Error::UnknownTag`], [`Error::MalformedRecord`] or
    /// [`Error::PoolOverflow`] as its source.
    pub fn decode(&mut self, parser: &mut Parser, count: usize) -> Result<()> {
        debug!(
            count,
            offset = parser.pos(),
            first_slot = self.slots.len(),
            "Decoding constant pool records"
        );

        for _ in 0..count {
            self.decode_record(parser, None)?;
        }

        Ok(())
    }

    /// Decodes one record and inserts it, failing if it would grow the pool past the `declared`
    /// slot count of a framed pool.
    fn decode_record(&mut self, parser: &mut Parser, declared: Option<usize>) -> Result<u16> {
        let slot = self.slots.len();
        let offset = parser.pos();

        parser
            .transactional(|p| {
                let constant = Constant::decode(p)?;
                if let Some(limit) = declared {
                    if self.len() + constant.tag().slots() > limit {
                        return Err(malformed_error!(
                            "{} at slot {} overruns the declared {} slots",
                            constant.tag(),
                            slot,
                            limit
                        ));
                    }
                }

                trace!(slot, offset, tag = %constant.tag(), "Decoded constant");
                self.insert(constant)
            })
            .map_err(|source| Error::Decode {
                slot,
                offset,
                source: Box::new(source),
            })
    }

    /// Writes every record in index order, without the count header.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the sink rejects a write.
    pub fn dump<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        for (_, constant) in self.iter() {
            constant.dump(out)?;
        }

        debug!(slots = self.len(), bytes = self.encoded_len(), "Dumped constant pool");
        Ok(())
    }

    /// Writes the `u16 constant_pool_count` followed by every record.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the sink rejects a write.
    pub fn write<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        let count = u16::try_from(self.len() + 1).map_err(|_| Error::PoolOverflow)?;
        write_be(out, count)?;
        self.dump(out)
    }

    /// Encodes the pool with its count header into a new buffer.
    ///
    /// # Errors
    /// See [`ConstantPool::write`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(2 + self.encoded_len());
        self.write(&mut out)?;
        Ok(out)
    }

    /// Byte width of [`ConstantPool::dump`]: the sum of every record's width.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.iter().map(|(_, constant)| constant.encoded_len()).sum()
    }

    /// Iterates over the live slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            Some((u16::try_from(index).ok()?, slot.as_ref()?))
        })
    }

    /// Announces every record to `visitor`, in index order.
    pub fn accept<V: ConstantVisitor + ?Sized>(&self, visitor: &mut V) {
        for (_, constant) in self.iter() {
            constant.accept(visitor);
        }
    }

    /// Index of the first `CONSTANT_Utf8` holding exactly `text`.
    #[must_use]
    pub fn find_utf8(&self, text: &str) -> Option<u16> {
        self.iter().find_map(|(index, constant)| match constant {
            Constant::Utf8(utf8) if utf8.value().ok() == Some(text) => Some(index),
            _ => None,
        })
    }

    /// Index of the first `CONSTANT_Class` naming `name` in internal form (`java/lang/Object`).
    ///
    /// Classes whose name does not resolve are skipped.
    #[must_use]
    pub fn find_class(&self, name: &str) -> Option<u16> {
        self.iter().find_map(|(index, constant)| match constant {
            Constant::Class(class) if class.resolve(self).ok() == Some(name) => Some(index),
            _ => None,
        })
    }

    /// Renders the record at `index` in source-like form, following its references.
    ///
    /// Class, module and package names use `.` separators, strings are quoted and escaped, and
    /// member references read `Class.name descriptor`.
    ///
    /// ```rust
    /// use classpool::PoolBuilder;
    ///
    /// let mut builder = PoolBuilder::new();
    /// let init = builder.methodref("java/lang/Object", "<init>", "()V")?;
    /// let text = builder.string("say \"hi\"")?;
    /// let pool = builder.finish();
    ///
    /// assert_eq!(pool.describe(init)?, "java.lang.Object.<init> ()V");
    /// assert_eq!(pool.describe(text)?, "\"say \\\"hi\\\"\"");
    /// # Ok::<(), classpool::Error>(())
    /// ```
    ///
    /// # Errors
    /// Returns the first error met while following references.
    pub fn describe(&self, index: u16) -> Result<String> {
        self.describe_constant(self.constant(index)?)
    }

    fn describe_constant(&self, constant: &Constant) -> Result<String> {
        Ok(match constant {
            Constant::Utf8(c) => c.to_string_lossy().into_owned(),
            Constant::Integer(c) => c.value().to_string(),
            Constant::Float(c) => format!("{:?}", c.value()),
            Constant::Long(c) => c.value().to_string(),
            Constant::Double(c) => format!("{:?}", c.value()),
            Constant::Class(c) => c.resolve(self)?.replace('/', "."),
            Constant::String(c) => format!("\"{}\"", escape(c.resolve(self)?)),
            Constant::Fieldref(c) => self.describe_member(c.class(self)?, c.name_and_type(self)?)?,
            Constant::Methodref(c) => {
                self.describe_member(c.class(self)?, c.name_and_type(self)?)?
            }
            Constant::InterfaceMethodref(c) => {
                self.describe_member(c.class(self)?, c.name_and_type(self)?)?
            }
            Constant::NameAndType(c) => self.describe_name_and_type(c)?,
            Constant::MethodHandle(c) => {
                format!("{} {}", c.kind()?, self.describe_constant(c.target(self)?)?)
            }
            Constant::MethodType(c) => c.resolve(self)?.to_owned(),
            Constant::Dynamic(c) => format!(
                "{}:{}",
                c.bootstrap_method_attr_index(),
                self.describe_name_and_type(c.name_and_type(self)?)?
            ),
            Constant::InvokeDynamic(c) => format!(
                "{}:{}",
                c.bootstrap_method_attr_index(),
                self.describe_name_and_type(c.name_and_type(self)?)?
            ),
            Constant::Module(c) => c.resolve(self)?.replace('/', "."),
            Constant::Package(c) => c.resolve(self)?.replace('/', "."),
        })
    }

    fn describe_name_and_type(&self, nat: &ConstantNameAndType) -> Result<String> {
        Ok(format!("{} {}", nat.name(self)?, nat.signature(self)?))
    }

    fn describe_member(&self, class: &ConstantClass, nat: &ConstantNameAndType) -> Result<String> {
        Ok(format!(
            "{}.{}",
            class.resolve(self)?.replace('/', "."),
            self.describe_name_and_type(nat)?
        ))
    }
}

/// Escapes quotes, backslashes and control characters for display inside a string literal.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{8}' => escaped.push_str("\\b"),
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl fmt::Display for ConstantPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, constant) in self.iter() {
            writeln!(f, "{index:>5})  {constant}")?;
        }
        Ok(())
    }
}
