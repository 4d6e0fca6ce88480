//! ReadCache implementation

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::memory::MemoryAccountant;
use crate::record::{now_epoch_secs, HeaderRecord};

use super::CacheEntry;

/// TTL-bounded read cache (internally synchronized)
#[derive(Debug)]
pub struct ReadCache {
    entries: RwLock<HashMap<Vec<u8>, CacheEntry>>,
    ttl_millis: AtomicU64,
    accountant: Arc<MemoryAccountant>,
}

impl ReadCache {
    pub fn new(ttl: Duration, accountant: Arc<MemoryAccountant>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl_millis: AtomicU64::new(ttl.as_millis() as u64),
            accountant,
        }
    }

    /// Cached value for `key` if present, younger than the TTL and its
    /// record has not expired.
    ///
    /// A stale hit is evicted and reported as a miss.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let ttl = self.ttl();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_stale(ttl, now_epoch_secs()) => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // Stale: re-check under the write lock, the entry may have been replaced
        let mut entries = self.entries.write();
        let stale = entries
            .get(key)
            .map(|entry| entry.is_stale(ttl, now_epoch_secs()))
            .unwrap_or(false);
        if stale {
            if let Some(entry) = entries.remove(key) {
                self.accountant.release(entry.charge);
            }
        }
        None
    }

    /// Insert or replace the entry for `key`.
    ///
    /// `charge` is what the caller already reserved for this entry; it is
    /// released when the entry leaves the cache. A replaced entry's charge is
    /// released immediately.
    pub fn put(&self, key: Vec<u8>, value: Vec<u8>, header: HeaderRecord, charge: u64) {
        let entry = CacheEntry {
            value,
            header,
            inserted_at: Instant::now(),
            charge,
        };
        if let Some(old) = self.entries.write().insert(key, entry) {
            self.accountant.release(old.charge);
        }
    }

    /// Drop the entry for `key`
    pub fn remove(&self, key: &[u8]) -> bool {
        match self.entries.write().remove(key) {
            Some(entry) => {
                self.accountant.release(entry.charge);
                true
            }
            None => false,
        }
    }

    /// Evict every entry older than the TTL or whose record expired;
    /// returns how many were evicted
    pub fn sweep(&self) -> usize {
        let ttl = self.ttl();
        let now = now_epoch_secs();
        let mut released = 0u64;
        let mut evicted = 0usize;

        self.entries.write().retain(|_, entry| {
            if entry.is_stale(ttl, now) {
                released += entry.charge;
                evicted += 1;
                false
            } else {
                true
            }
        });

        self.accountant.release(released);
        evicted
    }

    /// Drop every entry
    pub fn clear(&self) {
        let released: u64 = self.entries.write().drain().map(|(_, e)| e.charge).sum();
        self.accountant.release(released);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis.load(Ordering::Relaxed))
    }

    /// Change the TTL; applies to entries already cached
    pub fn set_ttl(&self, ttl: Duration) {
        self.ttl_millis.store(ttl.as_millis() as u64, Ordering::Relaxed);
    }
}
