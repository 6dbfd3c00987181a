//! Byte source and byte sink collaborators for constant pool decoding and encoding.
//!
//! # Key Components
//!
//! - [`crate::file::parser::Parser`] - Bounds-checked cursor over an in-memory byte buffer
//! - [`crate::file::io`] - Big-endian primitive reads and writes
//! - [`crate::file::mutf8`] - The JVM's modified UTF-8 string encoding
//!
//! Reading works on a resident `&[u8]`; writing targets any [`std::io::Write`] implementation,
//! typically a `Vec<u8>`.

pub mod io;
pub mod mutf8;
pub mod parser;
