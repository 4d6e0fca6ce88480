//! Memory Module
//!
//! A shared byte quota used to admission-control writes and cache inserts.
//!
//! ## Semantics
//! - `allocate(n)` succeeds only when `used + n <= max`
//! - With enforcement disabled every allocation succeeds and is still counted
//! - `release(n)` saturates at zero
//!
//! The accountant is purely advisory bookkeeping; it never touches the
//! allocator or the file.

mod accountant;

pub use accountant::{MemoryAccountant, MemoryPressure, CRITICAL_RATIO, HIGH_RATIO, LOG_RATIO};

/// Fixed overhead charged per `put`
pub const PUT_OVERHEAD: u64 = 1024;

/// Fixed overhead charged per cache entry
pub const CACHE_OVERHEAD: u64 = 512;

/// Bytes reserved for a persisted record
pub fn put_charge(key_len: usize, value_len: usize, name_vector_len: usize, data_vector_len: usize) -> u64 {
    key_len as u64
        + value_len as u64
        + name_vector_len as u64 * 4
        + data_vector_len as u64 * 4
        + PUT_OVERHEAD
}

/// Bytes reserved for a cached value
pub fn cache_charge(key_len: usize, value_len: usize, name_vector_len: usize) -> u64 {
    key_len as u64 + value_len as u64 + name_vector_len as u64 * 4 + CACHE_OVERHEAD
}
