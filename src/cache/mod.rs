//! Cache Module
//!
//! Time-bounded lookaside cache of decoded values keyed by record key.
//!
//! ## Responsibilities
//! - Serve repeated reads without touching the data file
//! - Evict lazily on a stale lookup and eagerly on a periodic sweep
//! - Return each entry's memory charge to the accountant when it leaves
//!
//! ## Data Structure Choice
//! `HashMap` behind a `parking_lot::RwLock`. The TTL is a single engine-wide
//! value held in an atomic, so changing it re-ages existing entries on their
//! next access.

mod table;

pub use table::ReadCache;

use std::time::{Duration, Instant};

use crate::record::HeaderRecord;

/// One cached value
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The decoded payload
    pub value: Vec<u8>,

    /// Header as it was when the value was cached
    pub header: HeaderRecord,

    /// When the entry was inserted
    pub inserted_at: Instant,

    /// Bytes reserved with the accountant for this entry
    pub charge: u64,
}

impl CacheEntry {
    /// Older than `ttl`, or the cached record's own expiry is before `now`
    pub fn is_stale(&self, ttl: Duration, now: i64) -> bool {
        self.inserted_at.elapsed() > ttl || self.header.is_expired_at(now)
    }
}
