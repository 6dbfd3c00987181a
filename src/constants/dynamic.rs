//! # Dynamic Linkage Records
//!
//! `CONSTANT_MethodHandle`, `CONSTANT_Dynamic` and `CONSTANT_InvokeDynamic`.
//!
//! ```text
//! MethodHandle:            tag | reference_kind (u8) | reference_index (u16)
//! Dynamic / InvokeDynamic: tag | bootstrap_method_attr_index (u16) | name_and_type_index (u16)
//! ```
//!
//! The bootstrap method index addresses the class file's `BootstrapMethods` attribute, not the
//! pool, so it is carried verbatim and never resolved here.
use std::{fmt, io::Write};

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{
    constants::{
        constant_conversions, Constant, ConstantNameAndType, ConstantTag, ConstantVisitor,
        PoolEntry,
    },
    file::{io::write_be, parser::Parser},
    ConstantPool, Error, Result,
};

/// The behaviour of a method handle, stored as its `reference_kind` byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ReferenceKind {
    #[strum(serialize = "getField")]
    GetField = 1,
    #[strum(serialize = "getStatic")]
    GetStatic = 2,
    #[strum(serialize = "putField")]
    PutField = 3,
    #[strum(serialize = "putStatic")]
    PutStatic = 4,
    #[strum(serialize = "invokeVirtual")]
    InvokeVirtual = 5,
    #[strum(serialize = "invokeStatic")]
    InvokeStatic = 6,
    #[strum(serialize = "invokeSpecial")]
    InvokeSpecial = 7,
    #[strum(serialize = "newInvokeSpecial")]
    NewInvokeSpecial = 8,
    #[strum(serialize = "invokeInterface")]
    InvokeInterface = 9,
}

impl ReferenceKind {
    /// Maps a raw `reference_kind` byte, or `None` outside `1..=9`.
    #[must_use]
    pub fn from_byte(kind: u8) -> Option<ReferenceKind> {
        ReferenceKind::iter().find(|k| k.value() == kind)
    }

    /// The raw `reference_kind` byte.
    #[must_use]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// The kind of record a handle of this behaviour usually references.
    #[must_use]
    pub fn expected_tag(self) -> ConstantTag {
        match self {
            ReferenceKind::GetField
            | ReferenceKind::GetStatic
            | ReferenceKind::PutField
            | ReferenceKind::PutStatic => ConstantTag::Fieldref,
            ReferenceKind::InvokeVirtual
            | ReferenceKind::InvokeStatic
            | ReferenceKind::InvokeSpecial
            | ReferenceKind::NewInvokeSpecial => ConstantTag::Methodref,
            ReferenceKind::InvokeInterface => ConstantTag::InterfaceMethodref,
        }
    }

    /// Whether a handle of this behaviour may reference a record of kind `tag`.
    ///
    /// `invokeStatic` and `invokeSpecial` handles may also point at interface methods.
    #[must_use]
    pub fn accepts(self, tag: ConstantTag) -> bool {
        tag == self.expected_tag()
            || (matches!(
                self,
                ReferenceKind::InvokeStatic | ReferenceKind::InvokeSpecial
            ) && tag == ConstantTag::InterfaceMethodref)
    }
}

/// A `CONSTANT_MethodHandle` record.
///
/// The `reference_kind` byte is stored as decoded; [`ConstantMethodHandle::kind`] checks it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstantMethodHandle {
    reference_kind: u8,
    reference_index: u16,
}

impl ConstantMethodHandle {
    /// Creates a handle of the given behaviour.
    #[must_use]
    pub fn new(kind: ReferenceKind, reference_index: u16) -> Self {
        ConstantMethodHandle {
            reference_kind: kind.value(),
            reference_index,
        }
    }

    /// Creates a handle from a raw `reference_kind` byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedRecord`] if `reference_kind` is outside `1..=9`.
    pub fn from_raw(reference_kind: u8, reference_index: u16) -> Result<Self> {
        let Some(kind) = ReferenceKind::from_byte(reference_kind) else {
            return Err(malformed_error!(
                "Invalid method handle reference kind - {}",
                reference_kind
            ));
        };

        Ok(ConstantMethodHandle::new(kind, reference_index))
    }

    /// The raw `reference_kind` byte.
    #[must_use]
    pub fn reference_kind(&self) -> u8 {
        self.reference_kind
    }

    /// Index of the referenced member record.
    #[must_use]
    pub fn reference_index(&self) -> u16 {
        self.reference_index
    }

    /// Points the handle at another slot. No validation is performed.
    pub fn set_reference_index(&mut self, reference_index: u16) {
        self.reference_index = reference_index;
    }

    /// The handle's behaviour.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedRecord`] if the stored byte is outside `1..=9`.
    pub fn kind(&self) -> Result<ReferenceKind> {
        ReferenceKind::from_byte(self.reference_kind).ok_or_else(|| {
            malformed_error!(
                "Invalid method handle reference kind - {}",
                self.reference_kind
            )
        })
    }

    /// Resolves the referenced member record.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedRecord`] for an invalid reference kind,
    /// [`crate::Error::IndexOutOfRange`] for a dangling index, or
    /// [`crate::Error::WrongReferencedTag`] if the record does not fit the reference kind.
    pub fn target<'p>(&self, pool: &'p ConstantPool) -> Result<&'p Constant> {
        let kind = self.kind()?;
        let target = pool.constant(self.reference_index)?;
        if !kind.accepts(target.tag()) {
            return Err(Error::WrongReferencedTag {
                referrer: Self::TAG,
                index: self.reference_index,
                expected: kind.expected_tag(),
                found: target.tag(),
            });
        }

        Ok(target)
    }
}

impl PoolEntry for ConstantMethodHandle {
    const TAG: ConstantTag = ConstantTag::MethodHandle;

    fn read_fields(parser: &mut Parser) -> Result<Self> {
        Ok(ConstantMethodHandle {
            reference_kind: parser.read_be::<u8>()?,
            reference_index: parser.read_be::<u16>()?,
        })
    }

    fn write_fields<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write_be(out, self.reference_kind)?;
        write_be(out, self.reference_index)
    }

    fn fields_size(&self) -> usize {
        3
    }

    fn from_constant(constant: &Constant) -> Option<&Self> {
        match constant {
            Constant::MethodHandle(entry) => Some(entry),
            _ => None,
        }
    }

    fn from_constant_mut(constant: &mut Constant) -> Option<&mut Self> {
        match constant {
            Constant::MethodHandle(entry) => Some(entry),
            _ => None,
        }
    }

    fn accept<V: ConstantVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_method_handle(self);
    }
}

constant_conversions!(ConstantMethodHandle, MethodHandle);

impl fmt::Display for ConstantMethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}](", Self::TAG, Self::TAG.value())?;
        match ReferenceKind::from_byte(self.reference_kind) {
            Some(kind) => write!(f, "{kind}")?,
            None => write!(f, "{}", self.reference_kind)?,
        }
        write!(f, ", {})", self.reference_index)
    }
}

macro_rules! bootstrap_constant {
    (
        $(#[$meta:meta])*
        $name:ident, $variant:ident, $visit:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            bootstrap_method_attr_index: u16,
            name_and_type_index: u16,
        }

        impl $name {
            /// Creates a record from its bootstrap method slot and name-and-type index.
            #[must_use]
            pub fn new(bootstrap_method_attr_index: u16, name_and_type_index: u16) -> Self {
                $name {
                    bootstrap_method_attr_index,
                    name_and_type_index,
                }
            }

            /// Index into the class file's `BootstrapMethods` attribute.
            #[must_use]
            pub fn bootstrap_method_attr_index(&self) -> u16 {
                self.bootstrap_method_attr_index
            }

            /// Index of the `CONSTANT_NameAndType`.
            #[must_use]
            pub fn name_and_type_index(&self) -> u16 {
                self.name_and_type_index
            }

            /// Changes the bootstrap method slot.
            pub fn set_bootstrap_method_attr_index(&mut self, bootstrap_method_attr_index: u16) {
                self.bootstrap_method_attr_index = bootstrap_method_attr_index;
            }

            /// Points the name-and-type at another slot. No validation is performed.
            pub fn set_name_and_type_index(&mut self, name_and_type_index: u16) {
                self.name_and_type_index = name_and_type_index;
            }

            /// Resolves the name-and-type record.
            ///
            /// # Errors
            /// Returns the resolution error if the index is dangling or not a
            /// `CONSTANT_NameAndType`.
            pub fn name_and_type<'p>(
                &self,
                pool: &'p ConstantPool,
            ) -> Result<&'p ConstantNameAndType> {
                pool.resolve::<ConstantNameAndType>(Self::TAG, self.name_and_type_index)
            }
        }

        impl PoolEntry for $name {
            const TAG: ConstantTag = ConstantTag::$variant;

            fn read_fields(parser: &mut Parser) -> Result<Self> {
                Ok($name {
                    bootstrap_method_attr_index: parser.read_be::<u16>()?,
                    name_and_type_index: parser.read_be::<u16>()?,
                })
            }

            fn write_fields<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
                write_be(out, self.bootstrap_method_attr_index)?;
                write_be(out, self.name_and_type_index)
            }

            fn fields_size(&self) -> usize {
                4
            }

            fn from_constant(constant: &Constant) -> Option<&Self> {
                match constant {
                    Constant::$variant(entry) => Some(entry),
                    _ => None,
                }
            }

            fn from_constant_mut(constant: &mut Constant) -> Option<&mut Self> {
                match constant {
                    Constant::$variant(entry) => Some(entry),
                    _ => None,
                }
            }

            fn accept<V: ConstantVisitor + ?Sized>(&self, visitor: &mut V) {
                visitor.$visit(self);
            }
        }

        constant_conversions!($name, $variant);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "{}[{}](bootstrap_method_attr_index = {}, name_and_type_index = {})",
                    Self::TAG,
                    Self::TAG.value(),
                    self.bootstrap_method_attr_index,
                    self.name_and_type_index
                )
            }
        }
    };
}

bootstrap_constant!(
    /// A `CONSTANT_Dynamic` record: a constant computed by a bootstrap method.
    ConstantDynamic, Dynamic, visit_dynamic
);

bootstrap_constant!(
    /// A `CONSTANT_InvokeDynamic` record: an `invokedynamic` call site.
    ConstantInvokeDynamic, InvokeDynamic, visit_invoke_dynamic
);
