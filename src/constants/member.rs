//! # Member References
//!
//! `CONSTANT_NameAndType` pairs a member name with its descriptor. `CONSTANT_Fieldref`,
//! `CONSTANT_Methodref` and `CONSTANT_InterfaceMethodref` combine a `CONSTANT_Class` with a
//! `CONSTANT_NameAndType` to name one member of one class.
//!
//! ```text
//! NameAndType: tag | name_index (u16) | signature_index (u16)
//! *ref:        tag | class_index (u16) | name_and_type_index (u16)
//! ```
use std::{fmt, io::Write};

use crate::{
    constants::{
        constant_conversions, Constant, ConstantClass, ConstantTag, ConstantVisitor, PoolEntry,
    },
    file::{io::write_be, parser::Parser},
    ConstantPool, Result,
};

/// A `CONSTANT_NameAndType` record.
///
/// Both indices must reference `CONSTANT_Utf8` slots: the member's simple name and its field
/// or method descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstantNameAndType {
    name_index: u16,
    signature_index: u16,
}

impl ConstantNameAndType {
    /// Creates a record from its two indices.
    #[must_use]
    pub fn new(name_index: u16, signature_index: u16) -> Self {
        ConstantNameAndType {
            name_index,
            signature_index,
        }
    }

    /// Index of the member name.
    #[must_use]
    pub fn name_index(&self) -> u16 {
        self.name_index
    }

    /// Index of the member descriptor.
    #[must_use]
    pub fn signature_index(&self) -> u16 {
        self.signature_index
    }

    /// Points the name at another slot. No validation is performed.
    pub fn set_name_index(&mut self, name_index: u16) {
        self.name_index = name_index;
    }

    /// Points the descriptor at another slot. No validation is performed.
    pub fn set_signature_index(&mut self, signature_index: u16) {
        self.signature_index = signature_index;
    }

    /// Resolves the member name.
    ///
    /// # Errors
    /// Returns the resolution error if the name index is dangling or not a `CONSTANT_Utf8`.
    pub fn name<'p>(&self, pool: &'p ConstantPool) -> Result<&'p str> {
        pool.resolve_utf8(Self::TAG, self.name_index)
    }

    /// Resolves the member descriptor.
    ///
    /// # Errors
    /// Returns the resolution error if the descriptor index is dangling or not a
    /// `CONSTANT_Utf8`.
    pub fn signature<'p>(&self, pool: &'p ConstantPool) -> Result<&'p str> {
        pool.resolve_utf8(Self::TAG, self.signature_index)
    }
}

impl PoolEntry for ConstantNameAndType {
    const TAG: ConstantTag = ConstantTag::NameAndType;

    fn read_fields(parser: &mut Parser) -> Result<Self> {
        Ok(ConstantNameAndType {
            name_index: parser.read_be::<u16>()?,
            signature_index: parser.read_be::<u16>()?,
        })
    }

    fn write_fields<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write_be(out, self.name_index)?;
        write_be(out, self.signature_index)
    }

    fn fields_size(&self) -> usize {
        4
    }

    fn from_constant(constant: &Constant) -> Option<&Self> {
        match constant {
            Constant::NameAndType(entry) => Some(entry),
            _ => None,
        }
    }

    fn from_constant_mut(constant: &mut Constant) -> Option<&mut Self> {
        match constant {
            Constant::NameAndType(entry) => Some(entry),
            _ => None,
        }
    }

    fn accept<V: ConstantVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_name_and_type(self);
    }
}

constant_conversions!(ConstantNameAndType, NameAndType);

impl fmt::Display for ConstantNameAndType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}](name_index = {}, signature_index = {})",
            Self::TAG,
            Self::TAG.value(),
            self.name_index,
            self.signature_index
        )
    }
}

macro_rules! member_ref_constant {
    (
        $(#[$meta:meta])*
        $name:ident, $variant:ident, $visit:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            class_index: u16,
            name_and_type_index: u16,
        }

        impl $name {
            /// Creates a record from its class and name-and-type indices.
            #[must_use]
            pub fn new(class_index: u16, name_and_type_index: u16) -> Self {
                $name {
                    class_index,
                    name_and_type_index,
                }
            }

            /// Index of the owning `CONSTANT_Class`.
            #[must_use]
            pub fn class_index(&self) -> u16 {
                self.class_index
            }

            /// Index of the member's `CONSTANT_NameAndType`.
            #[must_use]
            pub fn name_and_type_index(&self) -> u16 {
                self.name_and_type_index
            }

            /// Points the class at another slot. No validation is performed.
            pub fn set_class_index(&mut self, class_index: u16) {
                self.class_index = class_index;
            }

            /// Points the name-and-type at another slot. No validation is performed.
            pub fn set_name_and_type_index(&mut self, name_and_type_index: u16) {
                self.name_and_type_index = name_and_type_index;
            }

            /// Resolves the owning class record.
            ///
            /// # Errors
            /// Returns the resolution error if the class index is dangling or not a
            /// `CONSTANT_Class`.
            pub fn class<'p>(&self, pool: &'p ConstantPool) -> Result<&'p ConstantClass> {
                pool.resolve::<ConstantClass>(Self::TAG, self.class_index)
            }

            /// Resolves the owning class name, following the class record to its text.
            ///
            /// # Errors
            /// Returns the first resolution error met along the way.
            pub fn class_name<'p>(&self, pool: &'p ConstantPool) -> Result<&'p str> {
                self.class(pool)?.resolve(pool)
            }

            /// Resolves the member's name-and-type record.
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
                    class_index: parser.read_be::<u16>()?,
                    name_and_type_index: parser.read_be::<u16>()?,
                })
            }

            fn write_fields<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
                write_be(out, self.class_index)?;
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
                    "{}[{}](class_index = {}, name_and_type_index = {})",
                    Self::TAG,
                    Self::TAG.value(),
                    self.class_index,
                    self.name_and_type_index
                )
            }
        }
    };
}

member_ref_constant!(
    /// A `CONSTANT_Fieldref` record.
    ConstantFieldref, Fieldref, visit_fieldref
);

member_ref_constant!(
    /// A `CONSTANT_Methodref` record: a method of a class.
    ConstantMethodref, Methodref, visit_methodref
);

member_ref_constant!(
    /// A `CONSTANT_InterfaceMethodref` record: a method of an interface.
    ConstantInterfaceMethodref, InterfaceMethodref, visit_interface_methodref
);
