//! Decode-time limits for class-file framed constant pools.
//!
//! [`PoolConfig`] only affects [`crate::ConstantPool::parse_with`] and
//! [`crate::ConstantPool::read`]. Cross references are never checked while decoding regardless
//! of the configuration; use [`crate::ConstantPool::validate`] for that.

use crate::pool::MAX_SLOTS;

/// Limits applied while reading a `constant_pool_count` and the records that follow it.
///
/// # Examples
///
/// ```rust
/// use classpool::{ConstantPool, PoolConfig};
///
/// let config = PoolConfig::strict().with_max_slots(16);
/// assert!(ConstantPool::parse_with(&[0x00, 0x00], &config).is_err());
/// assert!(ConstantPool::parse_with(&[0x00, 0x00], &PoolConfig::permissive()).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Upper bound on the number of slots a pool may declare (default: 65534)
    pub max_slots: usize,

    /// Accept a `constant_pool_count` of 0 as an empty pool (default: true)
    /// A well-formed class file always declares at least 1.
    pub allow_empty: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_slots: MAX_SLOTS,
            allow_empty: true,
        }
    }
}

impl PoolConfig {
    /// Creates a configuration that rejects anything a JVM would refuse at the framing level.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_slots: MAX_SLOTS,
            allow_empty: false,
        }
    }

    /// Creates a configuration that accepts every pool that can be decoded at all.
    #[must_use]
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Lowers the slot limit, for callers decoding untrusted input with a memory budget.
    ///
    /// Values above 65534 are clamped, since a class file cannot declare more slots.
    #[must_use]
    pub fn with_max_slots(mut self, max_slots: usize) -> Self {
        self.max_slots = max_slots.min(MAX_SLOTS);
        self
    }
}
