//! Tests for ReadCache
//!
//! These tests verify:
//! - Hits, misses and lazy eviction of stale entries
//! - Record expiry overriding the TTL
//! - Retroactive TTL changes
//! - Periodic sweeps
//! - Charges flowing back to the accountant

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use slabkv::cache::ReadCache;
use slabkv::memory::MemoryAccountant;
use slabkv::record::{now_epoch_secs, HeaderRecord, NEVER_EXPIRES};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_cache(ttl: Duration) -> (Arc<MemoryAccountant>, ReadCache) {
    let memory = Arc::new(MemoryAccountant::new(1024 * 1024).unwrap());
    let cache = ReadCache::new(ttl, Arc::clone(&memory));
    (memory, cache)
}

fn header(key: &[u8]) -> HeaderRecord {
    HeaderRecord::new(key.to_vec(), 0, 5, NEVER_EXPIRES, vec![])
}

fn put(cache: &ReadCache, memory: &MemoryAccountant, key: &[u8], value: &[u8], charge: u64) {
    assert!(memory.allocate(charge));
    cache.put(key.to_vec(), value.to_vec(), header(key), charge);
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_get_hit_and_miss() {
    let (memory, cache) = setup_cache(Duration::from_secs(60));
    put(&cache, &memory, b"key", b"value", 100);

    assert_eq!(cache.get(b"key"), Some(b"value".to_vec()));
    assert_eq!(cache.get(b"other"), None);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_stale_entry_is_evicted_on_get() {
    let (memory, cache) = setup_cache(Duration::from_millis(20));
    put(&cache, &memory, b"key", b"value", 100);

    thread::sleep(Duration::from_millis(40));

    assert_eq!(cache.get(b"key"), None);
    assert!(cache.is_empty());
    assert_eq!(memory.used(), 0);
}

#[test]
fn test_ttl_change_is_retroactive() {
    let (memory, cache) = setup_cache(Duration::from_secs(60));
    put(&cache, &memory, b"key", b"value", 100);
    thread::sleep(Duration::from_millis(20));

    cache.set_ttl(Duration::from_millis(5));
    assert_eq!(cache.ttl(), Duration::from_millis(5));

    assert_eq!(cache.get(b"key"), None);
}

#[test]
fn test_sweep_removes_only_stale_entries() {
    let (memory, cache) = setup_cache(Duration::from_millis(50));
    put(&cache, &memory, b"old", b"1", 10);
    thread::sleep(Duration::from_millis(80));
    put(&cache, &memory, b"new", b"2", 20);

    let evicted = cache.sweep();

    assert_eq!(evicted, 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(b"new"), Some(b"2".to_vec()));
    assert_eq!(memory.used(), 20);
}

#[test]
fn test_replace_releases_previous_charge() {
    let (memory, cache) = setup_cache(Duration::from_secs(60));
    put(&cache, &memory, b"key", b"v1", 100);
    put(&cache, &memory, b"key", b"v2", 30);

    assert_eq!(memory.used(), 30);
    assert_eq!(cache.get(b"key"), Some(b"v2".to_vec()));
}

#[test]
fn test_remove_and_clear_release_charges() {
    let (memory, cache) = setup_cache(Duration::from_secs(60));
    put(&cache, &memory, b"a", b"1", 10);
    put(&cache, &memory, b"b", b"2", 20);
    put(&cache, &memory, b"c", b"3", 40);

    assert!(cache.remove(b"a"));
    assert!(!cache.remove(b"a"));
    assert_eq!(memory.used(), 60);

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(memory.used(), 0);
}

#[test]
fn test_zero_charge_entries() {
    let (memory, cache) = setup_cache(Duration::from_secs(60));

    cache.put(b"k".to_vec(), b"v".to_vec(), header(b"k"), 0);
    cache.remove(b"k");

    assert_eq!(memory.used(), 0);
}

#[test]
fn test_expired_record_is_a_miss_within_ttl() {
    let (memory, cache) = setup_cache(Duration::from_secs(60));
    let expired = HeaderRecord::new(b"key".to_vec(), 0, 5, now_epoch_secs() - 1, vec![]);
    assert!(memory.allocate(100));
    cache.put(b"key".to_vec(), b"value".to_vec(), expired, 100);

    assert_eq!(cache.get(b"key"), None);
    assert!(cache.is_empty());
    assert_eq!(memory.used(), 0);
}

#[test]
fn test_sweep_evicts_expired_records() {
    let (memory, cache) = setup_cache(Duration::from_secs(60));
    let expired = HeaderRecord::new(b"gone".to_vec(), 0, 1, now_epoch_secs() - 1, vec![]);
    assert!(memory.allocate(10));
    cache.put(b"gone".to_vec(), b"1".to_vec(), expired, 10);
    put(&cache, &memory, b"kept", b"2", 20);

    assert_eq!(cache.sweep(), 1);
    assert_eq!(cache.get(b"kept"), Some(b"2".to_vec()));
    assert_eq!(memory.used(), 20);
}
