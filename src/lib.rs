// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # classpool
//!
//! Decoding, inspection, construction and re-encoding of the constant pool of JVM class files.
//!
//! The constant pool is the 1-indexed table of tagged records at the heart of every class
//! file: text, numeric literals, and symbolic references to classes, members, method handles
//! and call sites. `classpool` models every record kind defined by the class file format up to
//! module and package constants, and keeps the on-disk bytes reproducible: decoding and then
//! dumping a pool yields the original bytes.
//!
//! ## Features
//!
//! - **Exact round trips** - Records keep their decoded field values, including dangling or
//!   ill-typed indices and non-canonical or undecodable `Utf8` payloads, so nothing is lost
//!   between decode and dump
//! - **Lazy resolution** - Cross references are checked when followed, never while decoding
//! - **Typed access** - One struct per record kind, with [`ConstantPool::get_as`] for typed lookups
//! - **Visitors** - [`ConstantVisitor`] has one required callback per record kind
//! - **Building** - [`PoolBuilder`] inserts records by name and reuses existing ones
//! - **Validation** - [`ConstantPool::validate`] checks every reference in one parallel pass
//!
//! ## Quick Start
//!
//! ```rust
//! use classpool::prelude::*;
//!
//! // constant_pool_count = 3: Utf8 "java/util", Package -> #1
//! let bytes = [
//!     0x00, 0x03,
//!     0x01, 0x00, 0x09, b'j', b'a', b'v', b'a', b'/', b'u', b't', b'i', b'l',
//!     0x14, 0x00, 0x01,
//! ];
//!
//! let pool = ConstantPool::parse(&bytes)?;
//! let package = pool.get_as::<ConstantPackage>(2)?;
//! assert_eq!(package.resolve(&pool)?, "java/util");
//! assert_eq!(pool.describe(2)?, "java.util");
//!
//! // Asking for the wrong kind is an error, not a panic
//! assert!(matches!(
//!     pool.get(2, ConstantTag::Utf8),
//!     Err(Error::TagMismatch { .. })
//! ));
//!
//! assert_eq!(pool.to_bytes()?, bytes);
//! # Ok::<(), classpool::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`constants`] - The record kinds, the [`Constant`] sum type and the [`PoolEntry`] trait
//! - [`pool`] - [`ConstantPool`], [`PoolBuilder`], [`PoolConfig`] and whole-pool validation
//! - [`file`] - Big-endian byte access and the modified UTF-8 codec
//!
//! ## Logging
//!
//! Decode and dump boundaries are reported through `tracing` at `debug` level, individual
//! records at `trace`, and broken references found by validation at `warn`. The library never
//! installs a subscriber.

#[macro_use]
pub(crate) mod error;

/// Constant pool record kinds.
///
/// Every kind is a plain struct implementing [`PoolEntry`]; [`Constant`] wraps exactly one of
/// them per pool slot.
pub mod constants;

/// Byte-level access: the big-endian [`Parser`] cursor, sink helpers and modified UTF-8.
pub mod file;

/// The constant pool table and the tooling built on it.
pub mod pool;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use classpool::prelude::*;
///
/// let mut builder = PoolBuilder::new();
/// let class = builder.class("java/lang/Object")?;
/// let pool = builder.finish();
/// assert_eq!(pool.get_as::<ConstantClass>(class)?.resolve(&pool)?, "java/lang/Object");
/// # Ok::<(), classpool::Error>(())
/// ```
pub mod prelude;

/// `classpool` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;

pub use constants::{
    Constant, ConstantClass, ConstantDouble, ConstantDynamic, ConstantFieldref, ConstantFloat,
    ConstantInteger, ConstantInterfaceMethodref, ConstantInvokeDynamic, ConstantLong,
    ConstantMethodHandle, ConstantMethodType, ConstantMethodref, ConstantModule,
    ConstantNameAndType, ConstantPackage, ConstantString, ConstantTag, ConstantUtf8,
    ConstantValue, ConstantVisitor, PoolEntry, ReferenceKind,
};

pub use file::parser::Parser;

pub use pool::{ConstantPool, PoolBuilder, PoolConfig};
