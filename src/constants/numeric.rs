//! # Numeric Literals
//!
//! `CONSTANT_Integer`, `CONSTANT_Float`, `CONSTANT_Long` and `CONSTANT_Double` records. Each
//! stores its value as a big-endian field of the natural width. `Long` and `Double` entries take
//! two pool slots, which the pool accounts for on insertion.
//!
//! Floating point values compare and hash by bit pattern so that any decoded value, NaN payloads
//! included, compares equal to itself after a round trip.
use std::{
    fmt,
    hash::{Hash, Hasher},
    io::Write,
};

use crate::{
    constants::{constant_conversions, Constant, ConstantTag, ConstantVisitor, PoolEntry},
    file::{io::write_be, parser::Parser},
    Result,
};

macro_rules! numeric_constant {
    (
        $(#[$meta:meta])*
        $name:ident, $variant:ident, $ty:ty, $visit:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug)]
        pub struct $name {
            value: $ty,
        }

        impl $name {
            /// Creates a record holding `value`.
            #[must_use]
            pub fn new(value: $ty) -> Self {
                $name { value }
            }

            /// The literal value.
            #[must_use]
            pub fn value(&self) -> $ty {
                self.value
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.value.to_be_bytes() == other.value.to_be_bytes()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.value.to_be_bytes().hash(state);
            }
        }

        impl PoolEntry for $name {
            const TAG: ConstantTag = ConstantTag::$variant;

            fn read_fields(parser: &mut Parser) -> Result<Self> {
                Ok($name::new(parser.read_be::<$ty>()?))
            }

            fn write_fields<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
                write_be(out, self.value)
            }

            fn fields_size(&self) -> usize {
                std::mem::size_of::<$ty>()
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
                write!(f, "{}[{}](bytes = {})", Self::TAG, Self::TAG.value(), self.value)
            }
        }
    };
}

numeric_constant!(
    /// A `CONSTANT_Integer` record: a 4-byte signed `int`.
    ConstantInteger, Integer, i32, visit_integer
);

numeric_constant!(
    /// A `CONSTANT_Float` record: a 4-byte IEEE 754 `float`.
    ConstantFloat, Float, f32, visit_float
);

numeric_constant!(
    /// A `CONSTANT_Long` record: an 8-byte signed `long`, occupying two pool slots.
    ConstantLong, Long, i64, visit_long
);

numeric_constant!(
    /// A `CONSTANT_Double` record: an 8-byte IEEE 754 `double`, occupying two pool slots.
    ConstantDouble, Double, f64, visit_double
);
