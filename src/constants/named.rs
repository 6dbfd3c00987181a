//! # Single-Index Name Records
//!
//! `CONSTANT_Class`, `CONSTANT_String`, `CONSTANT_MethodType`, `CONSTANT_Module` and
//! `CONSTANT_Package` share one shape: a single `u16` index that must point at a
//! `CONSTANT_Utf8` slot.
//!
//! ```text
//! tag (1 byte) | index (2 bytes, big-endian)
//! ```
//!
//! The index can be changed after construction and is not validated until it is resolved, so
//! pools with dangling or forward references still decode and re-encode unchanged.
use std::{fmt, io::Write};

use crate::{
    constants::{constant_conversions, Constant, ConstantTag, ConstantVisitor, PoolEntry},
    file::{io::write_be, parser::Parser},
    ConstantPool, Result,
};

macro_rules! utf8_reference_constant {
    (
        $(#[$meta:meta])*
        $name:ident, $variant:ident, $field:ident, $setter:ident, $visit:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            $field: u16,
        }

        impl $name {
            /// Creates a record referencing the `CONSTANT_Utf8` at the given index.
            ///
            /// The index is stored as given; it is checked when the record is resolved.
            #[must_use]
            pub fn new($field: u16) -> Self {
                $name { $field }
            }

            /// Index of the referenced `CONSTANT_Utf8`.
            #[must_use]
            pub fn $field(&self) -> u16 {
                self.$field
            }

            /// Points the record at another slot. No validation is performed.
            pub fn $setter(&mut self, $field: u16) {
                self.$field = $field;
            }

            /// Returns the text of the referenced `CONSTANT_Utf8`.
            ///
            /// # Errors
            /// Returns [`crate::Error::IndexOutOfRange`] if the index is not a live slot of
            /// `pool`, or [`crate::Error::WrongReferencedTag`] if the slot is not a
            /// `CONSTANT_Utf8`.
            pub fn resolve<'p>(&self, pool: &'p ConstantPool) -> Result<&'p str> {
                pool.resolve_utf8(Self::TAG, self.$field)
            }
        }

        impl PoolEntry for $name {
            const TAG: ConstantTag = ConstantTag::$variant;

            fn read_fields(parser: &mut Parser) -> Result<Self> {
                Ok($name::new(parser.read_be::<u16>()?))
            }

            fn write_fields<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
                write_be(out, self.$field)
            }

            fn fields_size(&self) -> usize {
                2
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
                    "{}[{}]({} = {})",
                    Self::TAG,
                    Self::TAG.value(),
                    stringify!($field),
                    self.$field
                )
            }
        }
    };
}

utf8_reference_constant!(
    /// A `CONSTANT_Class` record naming a class or interface in internal form
    /// (`java/lang/Object`).
    ConstantClass, Class, name_index, set_name_index, visit_class
);

utf8_reference_constant!(
    /// A `CONSTANT_String` record: a `java.lang.String` literal.
    ConstantString, String, string_index, set_string_index, visit_string
);

utf8_reference_constant!(
    /// A `CONSTANT_MethodType` record holding a method descriptor.
    ConstantMethodType, MethodType, descriptor_index, set_descriptor_index, visit_method_type
);

utf8_reference_constant!(
    /// A `CONSTANT_Module` record naming a module.
    ConstantModule, Module, name_index, set_name_index, visit_module
);

utf8_reference_constant!(
    /// A `CONSTANT_Package` record naming a package in internal form (`java/util`).
    ConstantPackage, Package, name_index, set_name_index, visit_package
);
