//! # classpool Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the classpool library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all classpool operations
pub use crate::Error;

/// The result type used throughout classpool
pub use crate::Result;

/// Cursor over the bytes being decoded
pub use crate::Parser;

// ================================================================================================
// Pool
// ================================================================================================

/// The constant pool, its builder and decode limits
pub use crate::{ConstantPool, PoolBuilder, PoolConfig};

// ================================================================================================
// Records
// ================================================================================================

/// Sum type, kind identifiers and the shared record interface
pub use crate::{Constant, ConstantTag, ConstantValue, PoolEntry};

/// Per-kind callbacks
pub use crate::ConstantVisitor;

/// Literal records
pub use crate::{ConstantDouble, ConstantFloat, ConstantInteger, ConstantLong, ConstantUtf8};

/// Name records
pub use crate::{ConstantClass, ConstantMethodType, ConstantModule, ConstantPackage, ConstantString};

/// Member references
pub use crate::{
    ConstantFieldref, ConstantInterfaceMethodref, ConstantMethodref, ConstantNameAndType,
};

/// Dynamic linkage records
pub use crate::{ConstantDynamic, ConstantInvokeDynamic, ConstantMethodHandle, ReferenceKind};
