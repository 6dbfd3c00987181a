use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// Identifiers for the kinds of records a constant pool can hold.
///
/// Each variant carries the tag byte that precedes the record on disk. Tags 2, 13 and 14 are
/// unassigned in the class file format and have no variant.
///
/// ## Record Categories
///
/// ### Literals
/// - **`Utf8`**: Modified UTF-8 text, referenced by almost every other kind
/// - **`Integer`**, **`Float`**: 4-byte numeric literals
/// - **`Long`**, **`Double`**: 8-byte numeric literals, each occupying two pool slots
///
/// ### Symbolic References
/// - **`Class`**, **`String`**, **`MethodType`**, **`Module`**, **`Package`**: one index to a `Utf8`
/// - **`NameAndType`**: name and descriptor of a field or method
/// - **`Fieldref`**, **`Methodref`**, **`InterfaceMethodref`**: a member of a class
///
/// ### Dynamic Linkage
/// - **`MethodHandle`**: a reference kind plus a member reference
/// - **`Dynamic`**, **`InvokeDynamic`**: bootstrap method slot plus a `NameAndType`
///
/// ## Reference
/// * [JVMS §4.4](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4) - The Constant Pool
#[derive(Clone, Copy, PartialEq, Debug, Display, EnumIter, EnumCount, IntoStaticStr, Eq, Hash)]
#[repr(u8)]
pub enum ConstantTag {
    /// `CONSTANT_Utf8` (1)
    #[strum(serialize = "CONSTANT_Utf8")]
    Utf8 = 1,
    /// `CONSTANT_Integer` (3)
    #[strum(serialize = "CONSTANT_Integer")]
    Integer = 3,
    /// `CONSTANT_Float` (4)
    #[strum(serialize = "CONSTANT_Float")]
    Float = 4,
    /// `CONSTANT_Long` (5)
    #[strum(serialize = "CONSTANT_Long")]
    Long = 5,
    /// `CONSTANT_Double` (6)
    #[strum(serialize = "CONSTANT_Double")]
    Double = 6,
    /// `CONSTANT_Class` (7)
    #[strum(serialize = "CONSTANT_Class")]
    Class = 7,
    /// `CONSTANT_String` (8)
    #[strum(serialize = "CONSTANT_String")]
    String = 8,
    /// `CONSTANT_Fieldref` (9)
    #[strum(serialize = "CONSTANT_Fieldref")]
    Fieldref = 9,
    /// `CONSTANT_Methodref` (10)
    #[strum(serialize = "CONSTANT_Methodref")]
    Methodref = 10,
    /// `CONSTANT_InterfaceMethodref` (11)
    #[strum(serialize = "CONSTANT_InterfaceMethodref")]
    InterfaceMethodref = 11,
    /// `CONSTANT_NameAndType` (12)
    #[strum(serialize = "CONSTANT_NameAndType")]
    NameAndType = 12,
    /// `CONSTANT_MethodHandle` (15)
    #[strum(serialize = "CONSTANT_MethodHandle")]
    MethodHandle = 15,
    /// `CONSTANT_MethodType` (16)
    #[strum(serialize = "CONSTANT_MethodType")]
    MethodType = 16,
    /// `CONSTANT_Dynamic` (17)
    #[strum(serialize = "CONSTANT_Dynamic")]
    Dynamic = 17,
    /// `CONSTANT_InvokeDynamic` (18)
    #[strum(serialize = "CONSTANT_InvokeDynamic")]
    InvokeDynamic = 18,
    /// `CONSTANT_Module` (19)
    #[strum(serialize = "CONSTANT_Module")]
    Module = 19,
    /// `CONSTANT_Package` (20)
    #[strum(serialize = "CONSTANT_Package")]
    Package = 20,
}

impl ConstantTag {
    /// Maps a raw tag byte to its kind, or `None` for unassigned values.
    #[must_use]
    pub fn from_byte(tag: u8) -> Option<ConstantTag> {
        Some(match tag {
            1 => ConstantTag::Utf8,
            3 => ConstantTag::Integer,
            4 => ConstantTag::Float,
            5 => ConstantTag::Long,
            6 => ConstantTag::Double,
            7 => ConstantTag::Class,
            8 => ConstantTag::String,
            9 => ConstantTag::Fieldref,
            10 => ConstantTag::Methodref,
            11 => ConstantTag::InterfaceMethodref,
            12 => ConstantTag::NameAndType,
            15 => ConstantTag::MethodHandle,
            16 => ConstantTag::MethodType,
            17 => ConstantTag::Dynamic,
            18 => ConstantTag::InvokeDynamic,
            19 => ConstantTag::Module,
            20 => ConstantTag::Package,
            _ => return None,
        })
    }

    /// The tag byte written before the record.
    #[must_use]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Number of pool slots a record of this kind occupies.
    #[must_use]
    pub fn slots(self) -> usize {
        match self {
            ConstantTag::Long | ConstantTag::Double => 2,
            _ => 1,
        }
    }
}
