//! # Constant Pool Records
//!
//! This module defines the closed family of records a constant pool can hold. Every kind has a
//! dedicated struct (for example [`ConstantPackage`]) implementing [`PoolEntry`], and the sum
//! type [`Constant`] wraps exactly one of them per pool slot.
//!
//! Records follow a permissive-decode, strict-resolve policy: decoding only checks that the
//! fixed-width fields are present, while cross references are validated when a caller resolves
//! them against a [`crate::ConstantPool`].
//!
//! ## Usage
//!
//! ```rust
//! use classpool::{ConstantPool, ConstantPackage, ConstantUtf8};
//!
//! let mut pool = ConstantPool::new();
//! let name = pool.insert(ConstantUtf8::new("java/util")?)?;
//! let package = pool.insert(ConstantPackage::new(name))?;
//!
//! let entry = pool.get_as::<ConstantPackage>(package)?;
//! assert_eq!(entry.resolve(&pool)?, "java/util");
//! # Ok::<(), classpool::Error>(())
//! ```
use std::{fmt, io::Write};

use crate::{
    file::{io::write_be, parser::Parser},
    ConstantPool, Error, Result,
};

/// Implements the [`Constant`] conversions for one record kind.
macro_rules! constant_conversions {
    ($ty:ident, $variant:ident) => {
        impl From<$ty> for crate::constants::Constant {
            fn from(entry: $ty) -> Self {
                crate::constants::Constant::$variant(entry)
            }
        }
    };
}
pub(crate) use constant_conversions;

mod dynamic;
mod member;
mod named;
mod numeric;
mod tag;
mod utf8;
mod visitor;

pub use dynamic::{ConstantDynamic, ConstantInvokeDynamic, ConstantMethodHandle, ReferenceKind};
pub use member::{
    ConstantFieldref, ConstantInterfaceMethodref, ConstantMethodref, ConstantNameAndType,
};
pub use named::{
    ConstantClass, ConstantMethodType, ConstantModule, ConstantPackage, ConstantString,
};
pub use numeric::{ConstantDouble, ConstantFloat, ConstantInteger, ConstantLong};
pub use tag::ConstantTag;
pub use utf8::ConstantUtf8;
pub use visitor::ConstantVisitor;

/// Interface shared by every constant pool record kind.
///
/// Implementors describe how their fixed-width fields are read and written; the tag byte is
/// handled here and by the pool decoder. The tag is an associated constant, so a record's kind
/// can never change after construction.
pub trait PoolEntry: Clone + Into<Constant> {
    /// The kind of this record.
    const TAG: ConstantTag;

    /// Reads the record's fields from a cursor positioned right after the tag byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if the fields are cut short, or
    /// [`crate::Error::MalformedRecord`] if a field fails its structural check.
    fn read_fields(parser: &mut Parser) -> Result<Self>;

    /// Writes the record's fields, without the tag byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::Io`] if the sink rejects the write.
    fn write_fields<W: Write + ?Sized>(&self, out: &mut W) -> Result<()>;

    /// Byte width of the record's fields, without the tag byte.
    fn fields_size(&self) -> usize;

    /// Borrows the record out of a [`Constant`] if the kinds match.
    fn from_constant(constant: &Constant) -> Option<&Self>;

    /// Borrows the record mutably out of a [`Constant`] if the kinds match.
    fn from_constant_mut(constant: &mut Constant) -> Option<&mut Self>;

    /// Announces this record to `visitor` through the callback for its kind.
    fn accept<V: ConstantVisitor + ?Sized>(&self, visitor: &mut V);

    /// The kind of this record.
    fn tag(&self) -> ConstantTag {
        Self::TAG
    }

    /// Writes the tag byte followed by the record's fields.
    ///
    /// # Errors
    /// Returns [`crate::Error::Io`] if the sink rejects the write.
    fn dump<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write_be(out, Self::TAG.value())?;
        self.write_fields(out)
    }

    /// Total encoded width, tag byte included.
    fn encoded_len(&self) -> usize {
        1 + self.fields_size()
    }
}

/// Expands to an exhaustive match binding the inner record of a [`Constant`].
macro_rules! with_entry {
    ($constant:expr, $entry:ident => $body:expr) => {
        match $constant {
            Constant::Utf8($entry) => $body,
            Constant::Integer($entry) => $body,
            Constant::Float($entry) => $body,
            Constant::Long($entry) => $body,
            Constant::Double($entry) => $body,
            Constant::Class($entry) => $body,
            Constant::String($entry) => $body,
            Constant::Fieldref($entry) => $body,
            Constant::Methodref($entry) => $body,
            Constant::InterfaceMethodref($entry) => $body,
            Constant::NameAndType($entry) => $body,
            Constant::MethodHandle($entry) => $body,
            Constant::MethodType($entry) => $body,
            Constant::Dynamic($entry) => $body,
            Constant::InvokeDynamic($entry) => $body,
            Constant::Module($entry) => $body,
            Constant::Package($entry) => $body,
        }
    };
}

/// One decoded constant pool slot.
///
/// Two constants are interchangeable for serialization purposes iff they compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Modified UTF-8 text
    Utf8(ConstantUtf8),
    /// `int` literal
    Integer(ConstantInteger),
    /// `float` literal
    Float(ConstantFloat),
    /// `long` literal, occupies two slots
    Long(ConstantLong),
    /// `double` literal, occupies two slots
    Double(ConstantDouble),
    /// Class or interface reference
    Class(ConstantClass),
    /// `java.lang.String` literal
    String(ConstantString),
    /// Field reference
    Fieldref(ConstantFieldref),
    /// Class method reference
    Methodref(ConstantMethodref),
    /// Interface method reference
    InterfaceMethodref(ConstantInterfaceMethodref),
    /// Member name and descriptor
    NameAndType(ConstantNameAndType),
    /// Method handle
    MethodHandle(ConstantMethodHandle),
    /// Method type descriptor
    MethodType(ConstantMethodType),
    /// Dynamically-computed constant
    Dynamic(ConstantDynamic),
    /// `invokedynamic` call site
    InvokeDynamic(ConstantInvokeDynamic),
    /// Module name
    Module(ConstantModule),
    /// Package name
    Package(ConstantPackage),
}

/// The logical value of a constant that stands for a Java value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstantValue<'p> {
    /// `int` literal
    Integer(i32),
    /// `float` literal
    Float(f32),
    /// `long` literal
    Long(i64),
    /// `double` literal
    Double(f64),
    /// Dereferenced text of a `String`, `Class`, `Module` or `Package` constant
    Text(&'p str),
}

impl Constant {
    /// Decodes one record, tag byte first.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownTag`] for unassigned tag values, otherwise whatever the
    /// kind's field decoder reports.
    pub fn decode(parser: &mut Parser) -> Result<Constant> {
        let offset = parser.pos();
        let raw = parser.read_be::<u8>()?;
        let Some(tag) = ConstantTag::from_byte(raw) else {
            return Err(Error::UnknownTag { tag: raw, offset });
        };

        Constant::read_fields(tag, parser)
    }

    /// Decodes the fields of a record whose tag byte has already been consumed.
    ///
    /// # Errors
    /// Returns whatever the kind's field decoder reports.
    pub fn read_fields(tag: ConstantTag, parser: &mut Parser) -> Result<Constant> {
        Ok(match tag {
            ConstantTag::Utf8 => Constant::Utf8(ConstantUtf8::read_fields(parser)?),
            ConstantTag::Integer => Constant::Integer(ConstantInteger::read_fields(parser)?),
            ConstantTag::Float => Constant::Float(ConstantFloat::read_fields(parser)?),
            ConstantTag::Long => Constant::Long(ConstantLong::read_fields(parser)?),
            ConstantTag::Double => Constant::Double(ConstantDouble::read_fields(parser)?),
            ConstantTag::Class => Constant::Class(ConstantClass::read_fields(parser)?),
            ConstantTag::String => Constant::String(ConstantString::read_fields(parser)?),
            ConstantTag::Fieldref => Constant::Fieldref(ConstantFieldref::read_fields(parser)?),
            ConstantTag::Methodref => Constant::Methodref(ConstantMethodref::read_fields(parser)?),
            ConstantTag::InterfaceMethodref => {
                Constant::InterfaceMethodref(ConstantInterfaceMethodref::read_fields(parser)?)
            }
            ConstantTag::NameAndType => {
                Constant::NameAndType(ConstantNameAndType::read_fields(parser)?)
            }
            ConstantTag::MethodHandle => {
                Constant::MethodHandle(ConstantMethodHandle::read_fields(parser)?)
            }
            ConstantTag::MethodType => {
                Constant::MethodType(ConstantMethodType::read_fields(parser)?)
            }
            ConstantTag::Dynamic => Constant::Dynamic(ConstantDynamic::read_fields(parser)?),
            ConstantTag::InvokeDynamic => {
                Constant::InvokeDynamic(ConstantInvokeDynamic::read_fields(parser)?)
            }
            ConstantTag::Module => Constant::Module(ConstantModule::read_fields(parser)?),
            ConstantTag::Package => Constant::Package(ConstantPackage::read_fields(parser)?),
        })
    }

    /// The kind of the wrapped record.
    #[must_use]
    pub fn tag(&self) -> ConstantTag {
        with_entry!(self, entry => entry.tag())
    }

    /// Writes the tag byte followed by the record's fields.
    ///
    /// # Errors
    /// Returns [`crate::Error::Io`] if the sink rejects the write.
    pub fn dump<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        with_entry!(self, entry => entry.dump(out))
    }

    /// Total encoded width, tag byte included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        with_entry!(self, entry => entry.encoded_len())
    }

    /// Announces the wrapped record to `visitor`.
    pub fn accept<V: ConstantVisitor + ?Sized>(&self, visitor: &mut V) {
        with_entry!(self, entry => entry.accept(visitor))
    }

    /// Borrows the wrapped record as `T`, if it is one.
    #[must_use]
    pub fn as_entry<T: PoolEntry>(&self) -> Option<&T> {
        T::from_constant(self)
    }

    /// Mutably borrows the wrapped record as `T`, if it is one.
    pub fn as_entry_mut<T: PoolEntry>(&mut self) -> Option<&mut T> {
        T::from_constant_mut(self)
    }

    /// Returns the Java value this constant stands for.
    ///
    /// Numeric literals return their value directly; `String`, `Class`, `Module` and `Package`
    /// return the text of the `Utf8` they reference.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] for kinds without a plain value, or the
    /// resolution error of the referenced slot.
    pub fn value<'p>(&self, pool: &'p ConstantPool) -> Result<ConstantValue<'p>> {
        match self {
            Constant::Integer(c) => Ok(ConstantValue::Integer(c.value())),
            Constant::Float(c) => Ok(ConstantValue::Float(c.value())),
            Constant::Long(c) => Ok(ConstantValue::Long(c.value())),
            Constant::Double(c) => Ok(ConstantValue::Double(c.value())),
            Constant::String(c) => c.resolve(pool).map(ConstantValue::Text),
            Constant::Class(c) => c.resolve(pool).map(ConstantValue::Text),
            Constant::Module(c) => c.resolve(pool).map(ConstantValue::Text),
            Constant::Package(c) => c.resolve(pool).map(ConstantValue::Text),
            other => Err(Error::NotSupported(other.tag())),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_entry!(self, entry => fmt::Display::fmt(entry, f))
    }
}
