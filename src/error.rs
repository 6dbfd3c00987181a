use thiserror::Error;

use crate::constants::ConstantTag;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::MalformedRecord {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::MalformedRecord {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure is local to the operation that produced it. Decoding stops at the first
/// error, while a failed resolution only affects the single lookup that failed; the rest of
/// the pool stays usable.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::TruncatedInput`] - Fewer bytes available than a record needs
/// - [`Error::UnknownTag`] - A tag byte that does not name any supported constant kind
/// - [`Error::MalformedRecord`] - A field value violates its declared width or encoding
/// - [`Error::Decode`] - Wraps one of the above with the pool slot and byte offset that failed
///
/// ## Resolution Errors
/// - [`Error::IndexOutOfRange`] - An index that does not address a live pool slot
/// - [`Error::TagMismatch`] - A direct lookup found a slot of another kind
/// - [`Error::WrongReferencedTag`] - A record references a slot of the wrong kind
///
/// ## Pool Errors
/// - [`Error::PoolOverflow`] - The pool cannot hold more than 65535 slots
/// - [`Error::LimitExceeded`] - A declared pool size exceeds the configured limit
/// - [`Error::Invalid`] - Collected failures of a whole-pool validation run
///
/// # Examples
///
/// ```rust
/// use classpool::{ConstantPool, Error};
///
/// match ConstantPool::parse(&[0x00, 0x02, 0x63]) {
///     Ok(pool) => println!("{} slots", pool.len()),
///     Err(err) => match err.root_cause() {
///         Error::UnknownTag { tag, offset } => eprintln!("tag {} at {}", tag, offset),
///         other => eprintln!("{}", other),
///     },
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input ended before a record's fixed-width fields could be read.
    #[error("Truncated input at offset {offset} - needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        /// Position of the read that failed
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Bytes that were actually left
        remaining: usize,
    },

    /// A tag byte did not match any supported constant kind.
    #[error("Unknown constant tag {tag} at offset {offset}")]
    UnknownTag {
        /// The raw tag value
        tag: u8,
        /// Position of the tag byte
        offset: usize,
    },

    /// A record field violates its declared width, range or encoding.
    ///
    /// The error includes the source location where the malformation was detected.
    #[error("Malformed record - {file}:{line}: {message}")]
    MalformedRecord {
        /// The message to be printed for the `MalformedRecord` error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The requested index does not address a live slot.
    ///
    /// Index 0, indices past the last slot, and the unusable slot following a
    /// `Long` or `Double` entry all produce this error.
    #[error("Constant pool index {index} is not a live slot (pool holds {size} slots)")]
    IndexOutOfRange {
        /// The offending index
        index: u16,
        /// Number of slots in the pool, excluding the reserved slot 0
        size: usize,
    },

    /// A direct pool lookup found a slot holding another kind of constant.
    #[error("Constant pool slot {index} holds {found}, expected {expected}")]
    TagMismatch {
        /// The slot that was looked up
        index: u16,
        /// The kind the caller asked for
        expected: ConstantTag,
        /// The kind stored in the slot
        found: ConstantTag,
    },

    /// A record's cross reference points at a slot of the wrong kind.
    #[error("{referrer} references slot {index} holding {found}, expected {expected}")]
    WrongReferencedTag {
        /// The kind of the record that holds the reference
        referrer: ConstantTag,
        /// The referenced slot
        index: u16,
        /// The kind the reference role requires
        expected: ConstantTag,
        /// The kind stored in the slot
        found: ConstantTag,
    },

    /// The pool already holds the maximum number of slots a class file can address.
    #[error("Constant pool is full")]
    PoolOverflow,

    /// A declared pool size exceeds the configured limit.
    #[error("Constant pool declares {declared} slots, limit is {limit}")]
    LimitExceeded {
        /// Slots declared by the input
        declared: usize,
        /// Limit configured in [`crate::PoolConfig`]
        limit: usize,
    },

    /// The operation is not defined for this kind of constant.
    #[error("Operation not supported for {0}")]
    NotSupported(ConstantTag),

    /// Decoding failed; carries the slot and byte offset of the failing record.
    #[error("Failed to decode constant pool slot {slot} at offset {offset}: {source}")]
    Decode {
        /// The slot the record would have been stored in
        slot: usize,
        /// Position of the record's tag byte
        offset: usize,
        /// What went wrong
        #[source]
        source: Box<Error>,
    },

    /// Whole-pool validation found broken cross references.
    ///
    /// Each entry pairs the referring slot with its resolution error.
    #[error("Constant pool has {} broken references", .0.len())]
    Invalid(Vec<(u16, Error)>),

    /// Failure of the underlying byte sink.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the innermost error, looking through [`Error::Decode`] wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Decode { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
