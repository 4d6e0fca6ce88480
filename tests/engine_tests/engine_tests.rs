//! Tests for Engine
//!
//! These tests verify:
//! - Basic get/put/update/delete operations
//! - Expiry, search and command execution
//! - Space reuse and memory admission
//! - Failure behaviour (write failures, corrupt blocks)
//! - Persistence across reopen, backup and maintenance

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use slabkv::config::{Config, MaintenanceConfig};
use slabkv::engine::{Engine, PutOptions, DATA_BACKUP_FILENAME};
use slabkv::protocol::{Command, CommandType};
use slabkv::query::SearchQuery;
use slabkv::record::{block_len, now_epoch_secs, payload_offset, BLOCK_HEADER_FIXED_LEN};
use slabkv::sql::SqlQuery;
use slabkv::SlabError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

fn setup_engine_with_memory_limit(limit: u64) -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .memory_limit(limit)
        .build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

fn reopen(temp_dir: &TempDir) -> Engine {
    let config = Config::builder().data_dir(temp_dir.path()).build();
    Engine::open(config).unwrap()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_engine_open_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("mydb");

    let engine = Engine::open_path(&data_dir).unwrap();

    assert!(data_dir.exists());
    assert!(engine.data_path().exists());
    assert_eq!(engine.stats().index_size, 0);
}

#[test]
fn test_engine_put_get() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"hello", b"world").unwrap();
    let result = engine.get(b"hello").unwrap();

    assert_eq!(result, Some(b"world".to_vec()));
}

#[test]
fn test_engine_get_nonexistent_key() {
    let (_temp, engine) = setup_temp_engine();

    assert_eq!(engine.get(b"nonexistent").unwrap(), None);
}

#[test]
fn test_engine_round_trip_with_vectors() {
    let (_temp, engine) = setup_temp_engine();
    let value: Vec<u8> = (0..=255).collect();

    let options = PutOptions::new()
        .name_vector(vec![0.25, 0.5, 0.75])
        .data_vector(vec![1.0, 2.0, 3.0, 4.0]);
    engine.put_with(b"binary", &value, options).unwrap();

    assert_eq!(engine.get(b"binary").unwrap(), Some(value));
    let header = engine.header(b"binary").unwrap();
    assert_eq!(header.name_vector, vec![0.25, 0.5, 0.75]);
    assert_eq!(header.data_size, 256);
}

#[test]
fn test_engine_empty_value_round_trip() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"empty", b"").unwrap();

    assert_eq!(engine.get(b"empty").unwrap(), Some(Vec::new()));
}

#[test]
fn test_engine_rejects_empty_key() {
    let (_temp, engine) = setup_temp_engine();

    assert!(matches!(
        engine.put(b"", b"value"),
        Err(SlabError::InvalidArgument(_))
    ));
    assert!(matches!(engine.get(b""), Err(SlabError::InvalidArgument(_))));
    assert_eq!(engine.stats().file_size, 0);
}

#[test]
fn test_engine_overwrite_tombstones_previous() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"key", b"first").unwrap();
    engine.put(b"key", b"second-and-longer").unwrap();

    assert_eq!(engine.get(b"key").unwrap(), Some(b"second-and-longer".to_vec()));
    assert_eq!(engine.stats().index_size, 1);
    assert!(engine.header(b"key").unwrap().is_active);
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_engine_delete() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"key", b"value").unwrap();
    engine.delete(b"key").unwrap();

    assert_eq!(engine.get(b"key").unwrap(), None);
    let header = engine.header(b"key").unwrap();
    assert!(!header.is_active);
}

#[test]
fn test_engine_delete_absent_key_is_noop() {
    let (_temp, engine) = setup_temp_engine();

    engine.delete(b"missing").unwrap();

    assert_eq!(engine.stats().index_size, 0);
}

#[test]
fn test_engine_delete_twice_is_safe() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"key", b"value").unwrap();
    engine.delete(b"key").unwrap();
    let free_after_first = engine.stats().free_bytes;
    engine.delete(b"key").unwrap();

    assert_eq!(engine.stats().free_bytes, free_after_first);
    assert_eq!(engine.get(b"key").unwrap(), None);
}

// =============================================================================
// Expiry Tests
// =============================================================================

#[test]
fn test_engine_expired_record_is_invisible() {
    let (_temp, engine) = setup_temp_engine();

    let options = PutOptions::new().expiry_time(now_epoch_secs() - 10);
    engine.put_with(b"stale", b"value", options).unwrap();

    assert_eq!(engine.get(b"stale").unwrap(), None);
    assert!(engine.find(&SearchQuery::exact_match("stale")).unwrap().is_empty());

    // Still occupies its block until collected
    assert!(engine.header(b"stale").unwrap().is_active);
    assert!(engine.stats().file_size > 0);
}

#[test]
fn test_engine_future_expiry_is_visible() {
    let (_temp, engine) = setup_temp_engine();

    let options = PutOptions::new().expires_in(Duration::from_secs(3600));
    engine.put_with(b"fresh", b"value", options).unwrap();

    assert_eq!(engine.get(b"fresh").unwrap(), Some(b"value".to_vec()));
}

#[test]
fn test_engine_cached_record_expires() {
    let (_temp, engine) = setup_temp_engine();

    let options = PutOptions::new().expiry_time(now_epoch_secs() + 1);
    engine.put_with(b"session", b"token", options).unwrap();
    assert_eq!(engine.get(b"session").unwrap(), Some(b"token".to_vec()));
    assert_eq!(engine.stats().cache_size, 1);

    thread::sleep(Duration::from_millis(2100));

    assert_eq!(engine.get(b"session").unwrap(), None);
    assert_eq!(engine.stats().cache_size, 0);
}

#[test]
fn test_engine_expired_put_is_not_cached() {
    let (_temp, engine) = setup_temp_engine();

    engine
        .put_with(b"stale", b"value", PutOptions::new().expiry_time(1))
        .unwrap();

    assert_eq!(engine.stats().cache_size, 0);
    assert_eq!(engine.get(b"stale").unwrap(), None);
}

#[test]
fn test_engine_collect_expired_removes_tombstones() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"gone", b"value").unwrap();
    engine.put(b"kept", b"value").unwrap();
    engine.delete(b"gone").unwrap();

    // Tombstones expire at deletion time; the collector needs a later second
    thread::sleep(Duration::from_millis(1100));

    assert_eq!(engine.collect_expired().unwrap(), 1);
    assert!(engine.header(b"gone").is_none());
    assert!(engine.header(b"kept").is_some());
    assert_eq!(engine.stats().index_size, 1);
}

#[test]
fn test_engine_defragmentation_report_alongside_readers() {
    let (_temp, engine) = setup_temp_engine();
    let engine = Arc::new(engine);

    engine.put(b"a", b"aaaa").unwrap();
    engine.put(b"b", b"bbbb").unwrap();
    engine.delete(b"a").unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..50 {
                    assert_eq!(engine.get(b"b").unwrap(), Some(b"bbbb".to_vec()));
                    engine.defragmentation_report();
                }
            })
        })
        .collect();
    for reader in readers {
        reader.join().unwrap();
    }

    let report = engine.defragmentation_report();
    let stats = engine.stats();
    assert_eq!(report.free_blocks, 1);
    assert_eq!(report.free_bytes, stats.free_bytes);
    assert_eq!(report.file_size, stats.file_size);
    assert!(report.free_ratio() > 0.0 && report.free_ratio() < 1.0);
}

#[test]
fn test_engine_compact_reports_work() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"a", b"aaaa").unwrap();
    engine.put(b"b", b"bbbb").unwrap();
    engine.put(b"c", b"cccc").unwrap();
    engine.delete(b"a").unwrap();
    engine.delete(b"b").unwrap();
    assert_eq!(engine.stats().free_blocks, 2);

    let report = engine.compact().unwrap();

    assert_eq!(report.blocks_merged, 1);
    assert_eq!(engine.stats().free_blocks, 1);
    assert_eq!(engine.get(b"c").unwrap(), Some(b"cccc".to_vec()));
}

// =============================================================================
// Update Tests
// =============================================================================

#[test]
fn test_engine_update_missing_key_fails() {
    let (_temp, engine) = setup_temp_engine();

    let result = engine.update(b"missing", b"value");

    assert!(matches!(result, Err(SlabError::KeyNotFound(_))));
}

#[test]
fn test_engine_update_deleted_key_fails() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"key", b"value").unwrap();
    engine.delete(b"key").unwrap();

    assert!(matches!(
        engine.update(b"key", b"new"),
        Err(SlabError::KeyNotFound(_))
    ));
}

#[test]
fn test_engine_update_in_place_keeps_address() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"key", b"hello world").unwrap();
    let before = engine.header(b"key").unwrap();

    engine.update(b"key", b"hi").unwrap();
    let after = engine.header(b"key").unwrap();

    assert_eq!(after.data_address, before.data_address);
    assert_eq!(after.data_size, 2);
    assert_eq!(engine.get(b"key").unwrap(), Some(b"hi".to_vec()));
}

#[test]
fn test_engine_update_same_size_keeps_address() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"key", b"12345").unwrap();
    let before = engine.header(b"key").unwrap();

    engine.update(b"key", b"54321").unwrap();

    assert_eq!(engine.header(b"key").unwrap().data_address, before.data_address);
    assert_eq!(engine.get(b"key").unwrap(), Some(b"54321".to_vec()));
}

#[test]
fn test_engine_update_larger_value_relocates() {
    let (_temp, engine) = setup_temp_engine();

    let options = PutOptions::new()
        .expires_in(Duration::from_secs(3600))
        .name_vector(vec![1.0, 0.0]);
    engine.put_with(b"key", b"short", options).unwrap();
    let before = engine.header(b"key").unwrap();

    engine.update(b"key", b"a considerably longer value").unwrap();
    let after = engine.header(b"key").unwrap();

    assert_ne!(after.data_address, before.data_address);
    assert_eq!(after.expiry_time, before.expiry_time);
    assert_eq!(after.name_vector, before.name_vector);
    assert_eq!(
        engine.get(b"key").unwrap(),
        Some(b"a considerably longer value".to_vec())
    );
}

#[test]
fn test_engine_update_in_place_survives_reopen() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"key", b"original value").unwrap();
    engine.update(b"key", b"new").unwrap();
    drop(engine);

    let engine = reopen(&temp);
    assert_eq!(engine.get(b"key").unwrap(), Some(b"new".to_vec()));
}

// =============================================================================
// Space Reuse Tests
// =============================================================================

#[test]
fn test_engine_delete_releases_block() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"key", b"value").unwrap();
    engine.delete(b"key").unwrap();

    let stats = engine.stats();
    assert_eq!(stats.free_blocks, 1);
    assert_eq!(stats.free_bytes, block_len(3, 5, None));
}

#[test]
fn test_engine_put_reuses_freed_block() {
    let (_temp, engine) = setup_temp_engine();

    let value = vec![b'x'; 100];
    engine.put(b"a", &value).unwrap();
    engine.put(b"z", b"tail").unwrap();
    let freed_address = engine.header(b"a").unwrap().data_address;
    let file_size = engine.stats().file_size;

    engine.delete(b"a").unwrap();
    assert_eq!(engine.stats().free_blocks, 1);

    engine.put(b"b", &value).unwrap();

    let stats = engine.stats();
    assert_eq!(engine.header(b"b").unwrap().data_address, freed_address);
    assert_eq!(stats.free_blocks, 0);
    assert_eq!(stats.free_bytes, 0);
    assert_eq!(stats.file_size, file_size);
}

#[test]
fn test_engine_smaller_put_splits_freed_block() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"a", &[b'x'; 100]).unwrap();
    engine.put(b"z", b"tail").unwrap();
    engine.delete(b"a").unwrap();
    let freed = engine.stats().free_bytes;

    engine.put(b"b", &[b'y'; 40]).unwrap();

    let stats = engine.stats();
    assert_eq!(stats.free_blocks, 1);
    assert_eq!(stats.free_bytes, freed - block_len(1, 40, None));
    assert_eq!(engine.get(b"b").unwrap(), Some(vec![b'y'; 40]));
    assert_eq!(engine.get(b"z").unwrap(), Some(b"tail".to_vec()));
}

#[test]
fn test_engine_small_remainder_is_not_split() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"a", &[b'x'; 100]).unwrap();
    engine.put(b"z", b"tail").unwrap();
    let freed_address = engine.header(b"a").unwrap().data_address;
    engine.delete(b"a").unwrap();

    // The leftover tail would be shorter than the smallest block
    engine.put(b"b", &[b'y'; 70]).unwrap();

    assert_eq!(engine.header(b"b").unwrap().data_address, freed_address);
    assert_eq!(engine.stats().free_blocks, 0);
    drop(engine);

    let engine = reopen(&temp);
    assert_eq!(engine.stats().free_blocks, 0);
    assert_eq!(engine.get(b"b").unwrap(), Some(vec![b'y'; 70]));

    // The whole slot comes back on delete
    engine.delete(b"b").unwrap();
    assert_eq!(engine.stats().free_bytes, block_len(1, 100, None));
    assert_eq!(engine.get(b"z").unwrap(), Some(b"tail".to_vec()));
}

#[test]
fn test_engine_delete_releases_vector_block() {
    let (_temp, engine) = setup_temp_engine();

    let options = PutOptions::new().data_vector(vec![0.5; 8]);
    engine.put_with(b"vec", b"payload", options).unwrap();
    engine.put(b"after", b"x").unwrap();
    engine.delete(b"vec").unwrap();

    assert_eq!(engine.stats().free_bytes, block_len(3, 7, Some(8)));
}

#[test]
fn test_engine_delete_after_shrink_releases_whole_block() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"k", &[b'x'; 100]).unwrap();
    engine.put(b"z", b"tail").unwrap();
    engine.update(b"k", b"short").unwrap();
    engine.delete(b"k").unwrap();

    assert_eq!(engine.stats().free_bytes, block_len(1, 100, None));
    drop(engine);

    let engine = reopen(&temp);
    let stats = engine.stats();
    assert_eq!(stats.free_blocks, 1);
    assert_eq!(stats.free_bytes, block_len(1, 100, None));
}

#[test]
fn test_engine_example_scenario() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"k1", b"v1").unwrap();
    assert_eq!(engine.get(b"k1").unwrap(), Some(b"v1".to_vec()));

    engine.put(b"k1", b"v2").unwrap();
    assert_eq!(engine.get(b"k1").unwrap(), Some(b"v2".to_vec()));

    let before = engine.stats().free_bytes;
    engine.delete(b"k1").unwrap();
    assert_eq!(engine.get(b"k1").unwrap(), None);

    let after = engine.stats().free_bytes;
    assert_eq!(after, before + block_len(2, 2, None));
}

// =============================================================================
// Memory Admission Tests
// =============================================================================

#[test]
fn test_engine_memory_limit_rejects_put() {
    let (_temp, engine) = setup_engine_with_memory_limit(4096);
    let value = vec![b'v'; 1000];

    engine.put(b"a", &value).unwrap();
    engine.put(b"b", &value).unwrap();
    let before = engine.stats();

    let result = engine.put(b"c", &value);

    assert!(matches!(result, Err(SlabError::MemoryLimitExceeded { .. })));
    let after = engine.stats();
    assert!(engine.header(b"c").is_none());
    assert_eq!(after.index_size, before.index_size);
    assert_eq!(after.file_size, before.file_size);
    assert_eq!(after.used_memory, before.used_memory);
}

#[test]
fn test_engine_delete_returns_reservation() {
    let (_temp, engine) = setup_engine_with_memory_limit(4096);
    let value = vec![b'v'; 1000];

    engine.put(b"a", &value).unwrap();
    engine.put(b"b", &value).unwrap();
    assert!(engine.put(b"c", &value).is_err());

    engine.delete(b"a").unwrap();

    engine.put(b"c", &value).unwrap();
    assert_eq!(engine.get(b"c").unwrap().map(|v| v.len()), Some(1000));
}

#[test]
fn test_engine_soft_memory_limit_admits_everything() {
    let (_temp, engine) = setup_engine_with_memory_limit(2048);
    engine.set_memory_limit_enabled(false);

    for i in 0..10 {
        let key = format!("key{}", i);
        engine.put(key.as_bytes(), &[0u8; 512]).unwrap();
    }

    let stats = engine.stats();
    assert_eq!(stats.index_size, 10);
    assert!(stats.used_memory > stats.max_memory);
}

#[test]
fn test_engine_read_still_succeeds_when_cache_is_over_quota() {
    let (temp, engine) = setup_engine_with_memory_limit(1100);

    engine.put(b"k", &[1u8; 40]).unwrap();
    drop(engine);

    // Reopen starts with a cold cache; the live record keeps its reservation
    let config = Config::builder()
        .data_dir(temp.path())
        .memory_limit(1100)
        .build();
    let engine = Engine::open(config).unwrap();

    // Cache reservation fails; the read must not
    assert_eq!(engine.get(b"k").unwrap(), Some(vec![1u8; 40]));
    assert_eq!(engine.stats().cache_size, 0);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_engine_failed_put_leaves_no_active_record() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .max_data_file_size(100)
        .build();
    let engine = Engine::open(config).unwrap();

    engine.put(b"k1", b"v1").unwrap();

    let result = engine.put(b"k1", &[b'x'; 200]);

    assert!(matches!(result, Err(SlabError::WriteFailure { .. })));
    assert_eq!(engine.get(b"k1").unwrap(), None);
    assert!(!engine.header(b"k1").unwrap().is_active);
    assert_eq!(engine.stats().used_memory, 0);
}

#[test]
fn test_engine_detects_corrupt_block() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"key", b"value").unwrap();
    let path = engine.data_path();
    drop(engine);

    // Clobber the header/data delimiter
    let mut file = OpenOptions::new().write(true).open(&path).unwrap();
    file.seek(SeekFrom::Start(BLOCK_HEADER_FIXED_LEN + 3)).unwrap();
    file.write_all(b"XXXX").unwrap();
    file.sync_all().unwrap();
    drop(file);

    let engine = reopen(&temp);
    let result = engine.get(b"key");

    assert!(matches!(result, Err(SlabError::CorruptBlock { address: 0, .. })));
}

#[test]
fn test_engine_detects_key_mismatch() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"abc", b"value").unwrap();
    let path = engine.data_path();
    drop(engine);

    let mut file = OpenOptions::new().write(true).open(&path).unwrap();
    file.seek(SeekFrom::Start(BLOCK_HEADER_FIXED_LEN)).unwrap();
    file.write_all(b"xyz").unwrap();
    file.sync_all().unwrap();
    drop(file);

    let engine = reopen(&temp);
    assert!(matches!(
        engine.get(b"abc"),
        Err(SlabError::CorruptBlock { .. })
    ));
}

// =============================================================================
// Search Tests
// =============================================================================

#[test]
fn test_engine_find_exact_and_mask() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"document:1", b"one").unwrap();
    engine.put(b"document:2", b"two").unwrap();
    engine.put(b"document:10", b"ten").unwrap();
    engine.put(b"other:1", b"other").unwrap();

    let exact = engine.find(&SearchQuery::exact_match("document:1")).unwrap();
    assert_eq!(exact, vec![b"one".to_vec()]);

    let masked = engine.find(&SearchQuery::mask_search("document:?")).unwrap();
    assert_eq!(masked, vec![b"one".to_vec(), b"two".to_vec()]);
}

#[test]
fn test_engine_find_skips_deleted() {
    let (_temp, engine) = setup_temp_engine();

    engine.put(b"item:1", b"one").unwrap();
    engine.put(b"item:2", b"two").unwrap();
    engine.delete(b"item:1").unwrap();

    let found = engine.find(&SearchQuery::mask_search("item:?")).unwrap();
    assert_eq!(found, vec![b"two".to_vec()]);
}

#[test]
fn test_engine_find_by_vector() {
    let (_temp, engine) = setup_temp_engine();

    engine
        .put_with(b"east", b"E", PutOptions::new().name_vector(vec![1.0, 0.0]))
        .unwrap();
    engine
        .put_with(b"north", b"N", PutOptions::new().name_vector(vec![0.0, 1.0]))
        .unwrap();
    engine
        .put_with(b"northeast", b"NE", PutOptions::new().name_vector(vec![0.7, 0.7]))
        .unwrap();
    engine.put(b"plain", b"P").unwrap();

    let found = engine
        .find(&SearchQuery::vector_search(vec![1.0, 0.1], 0.9))
        .unwrap();

    assert_eq!(found, vec![b"E".to_vec()]);

    let wide = engine
        .find(&SearchQuery::vector_search(vec![1.0, 0.0], 0.5))
        .unwrap();
    assert_eq!(wide, vec![b"E".to_vec(), b"NE".to_vec()]);
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_engine_execute_commands() {
    let (_temp, engine) = setup_temp_engine();

    let response = engine
        .execute(Command::Put {
            key: b"key".to_vec(),
            value: b"value".to_vec(),
            options: PutOptions::default(),
        })
        .unwrap();
    assert!(response.success);
    assert_eq!(response.message, "Data stored successfully");

    let response = engine.execute(Command::Get { key: b"key".to_vec() }).unwrap();
    assert!(response.success);
    assert_eq!(response.data, Some(b"value".to_vec()));

    let response = engine.execute(Command::Ping).unwrap();
    assert_eq!(response.message, "PONG");

    let response = engine.execute(Command::Stats).unwrap();
    assert_eq!(response.stats.unwrap().index_size, 1);
}

#[test]
fn test_engine_execute_get_missing() {
    let (_temp, engine) = setup_temp_engine();

    let response = engine.execute(Command::Get { key: b"nope".to_vec() }).unwrap();

    assert!(!response.success);
    assert_eq!(response.message, "Key not found or expired");
    assert!(response.data.is_none());
}

#[test]
fn test_engine_execute_update_missing_is_error() {
    let (_temp, engine) = setup_temp_engine();

    let result = engine.execute(Command::Update {
        key: b"nope".to_vec(),
        value: b"v".to_vec(),
    });

    assert!(matches!(result, Err(SlabError::KeyNotFound(_))));
}

#[test]
fn test_engine_execute_sql() {
    let (_temp, engine) = setup_temp_engine();

    let query = SqlQuery::create_table("users")
        .column("name", "STRING")
        .build()
        .unwrap();
    let response = engine
        .execute(Command::Sql {
            command: CommandType::SqlCreateTable,
            query: Some(query),
        })
        .unwrap();
    assert!(response.success);
    assert!(response.sql_result.unwrap().success);

    let response = engine
        .execute(Command::Sql {
            command: CommandType::SqlExecute,
            query: None,
        })
        .unwrap();
    assert!(!response.success);
    assert_eq!(response.message, "SQL query is required for SQL commands");
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_engine_reopen_preserves_data() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"a", b"alpha").unwrap();
    engine.put(b"b", b"beta").unwrap();
    engine.delete(b"b").unwrap();
    engine.shutdown().unwrap();
    drop(engine);

    let engine = reopen(&temp);

    assert_eq!(engine.get(b"a").unwrap(), Some(b"alpha".to_vec()));
    assert_eq!(engine.get(b"b").unwrap(), None);

    // The inactive block is rediscovered by the startup scan
    let stats = engine.stats();
    assert_eq!(stats.free_blocks, 1);
    assert_eq!(stats.free_bytes, block_len(1, 4, None));
}

#[test]
fn test_engine_reopen_keeps_free_space_after_split() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"a", &[b'a'; 200]).unwrap();
    engine.put(b"b", &[b'b'; 200]).unwrap();
    engine.delete(b"a").unwrap();
    engine.put(b"c", &[b'c'; 50]).unwrap();
    engine.delete(b"b").unwrap();

    let before = engine.stats();
    assert_eq!(before.free_blocks, 2);
    assert_eq!(
        before.free_bytes,
        block_len(1, 200, None) * 2 - block_len(1, 50, None)
    );
    engine.shutdown().unwrap();
    drop(engine);

    let engine = reopen(&temp);

    let after = engine.stats();
    assert_eq!(after.free_blocks, before.free_blocks);
    assert_eq!(after.free_bytes, before.free_bytes);
    assert_eq!(engine.get(b"c").unwrap(), Some(vec![b'c'; 50]));
}

#[test]
fn test_engine_reopen_rediscovers_vector_block() {
    let (temp, engine) = setup_temp_engine();

    let options = PutOptions::new().data_vector(vec![0.5; 8]);
    engine.put_with(b"vec", b"payload", options).unwrap();
    engine.put(b"after", b"x").unwrap();
    engine.delete(b"vec").unwrap();
    drop(engine);

    let engine = reopen(&temp);

    let stats = engine.stats();
    assert_eq!(stats.free_blocks, 1);
    assert_eq!(stats.free_bytes, block_len(3, 7, Some(8)));
    assert_eq!(engine.get(b"after").unwrap(), Some(b"x".to_vec()));
}

#[test]
fn test_engine_reopen_reserves_live_records() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"a", &[0u8; 100]).unwrap();
    let used = engine.stats().used_memory;
    drop(engine);

    let engine = reopen(&temp);
    assert_eq!(engine.stats().used_memory, used);
}

#[test]
fn test_engine_unreserved_records_release_nothing() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"a", &[0u8; 100]).unwrap();
    engine.put(b"b", &[0u8; 100]).unwrap();
    let per_record = engine.stats().used_memory / 2;
    drop(engine);

    // Room for one reservation only; "a" loads first
    let config = Config::builder()
        .data_dir(temp.path())
        .memory_limit(per_record + per_record / 2)
        .build();
    let engine = Engine::open(config).unwrap();
    assert_eq!(engine.stats().used_memory, per_record);

    engine.delete(b"b").unwrap();
    assert_eq!(engine.stats().used_memory, per_record);

    engine.delete(b"a").unwrap();
    assert_eq!(engine.stats().used_memory, 0);
}

// =============================================================================
// Backup Tests
// =============================================================================

#[test]
fn test_engine_backup_and_verify() {
    let (temp, engine) = setup_temp_engine();
    let backup_dir = temp.path().join("backup");

    engine.put(b"a", b"alpha").unwrap();
    engine.put(b"b", b"beta").unwrap();

    let manifest = engine.backup(&backup_dir).unwrap();

    assert_eq!(manifest.data_len, engine.stats().file_size);
    let verified = Engine::verify_backup(&backup_dir).unwrap();
    assert_eq!(verified, manifest);
}

#[test]
fn test_engine_backup_detects_tampering() {
    let (temp, engine) = setup_temp_engine();
    let backup_dir = temp.path().join("backup");

    engine.put(b"a", b"alpha").unwrap();
    engine.backup(&backup_dir).unwrap();

    let mut file = OpenOptions::new()
        .append(true)
        .open(backup_dir.join(DATA_BACKUP_FILENAME))
        .unwrap();
    file.write_all(b"junk").unwrap();
    drop(file);

    assert!(matches!(
        Engine::verify_backup(&backup_dir),
        Err(SlabError::Backup(_))
    ));
}

#[test]
fn test_engine_backup_is_openable() {
    let (temp, engine) = setup_temp_engine();
    let backup_dir = temp.path().join("backup");

    engine.put(b"a", b"alpha").unwrap();
    engine.backup(&backup_dir).unwrap();

    let restore_dir = temp.path().join("restore");
    std::fs::create_dir_all(&restore_dir).unwrap();
    std::fs::copy(backup_dir.join(DATA_BACKUP_FILENAME), restore_dir.join("data.bin")).unwrap();
    std::fs::copy(backup_dir.join("index.idx.backup"), restore_dir.join("index.idx")).unwrap();

    let restored = Engine::open_path(&restore_dir).unwrap();
    assert_eq!(restored.get(b"a").unwrap(), Some(b"alpha".to_vec()));
}

// =============================================================================
// Cache Tests
// =============================================================================

#[test]
fn test_engine_cache_populated_by_reads() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"key", b"value").unwrap();
    drop(engine);

    let engine = reopen(&temp);
    assert_eq!(engine.stats().cache_size, 0);

    engine.get(b"key").unwrap();
    assert_eq!(engine.stats().cache_size, 1);

    engine.set_cache_ttl(Duration::from_millis(0));
    thread::sleep(Duration::from_millis(5));
    assert_eq!(engine.sweep_cache(), 1);
    assert_eq!(engine.stats().cache_size, 0);
}

#[test]
fn test_engine_cache_ttl_is_adjustable() {
    let (_temp, engine) = setup_temp_engine();

    engine.set_cache_ttl(Duration::from_secs(42));

    assert_eq!(engine.cache_ttl(), Duration::from_secs(42));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_engine_concurrent_writers_and_readers() {
    let (_temp, engine) = setup_temp_engine();
    let engine = Arc::new(engine);

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..50 {
                    let key = format!("t{}-k{}", t, i);
                    let value = format!("value-{}-{}", t, i);
                    engine.put(key.as_bytes(), value.as_bytes()).unwrap();
                    if i % 5 == 0 {
                        engine.delete(key.as_bytes()).unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in writers {
        handle.join().unwrap();
    }

    for t in 0..4 {
        for i in 0..50 {
            let key = format!("t{}-k{}", t, i);
            let expected = if i % 5 == 0 {
                None
            } else {
                Some(format!("value-{}-{}", t, i).into_bytes())
            };
            assert_eq!(engine.get(key.as_bytes()).unwrap(), expected);
        }
    }
}

// =============================================================================
// Maintenance Tests
// =============================================================================

#[test]
fn test_engine_maintenance_collects_tombstones() {
    let temp_dir = TempDir::new().unwrap();
    let maintenance = MaintenanceConfig {
        expiry_collection_interval: Duration::from_millis(200),
        free_block_merge_interval: Duration::from_millis(200),
        defragmentation_interval: Duration::ZERO,
        memory_log_interval: Duration::ZERO,
        memory_monitor_interval: Duration::from_millis(200),
        cache_sweep_interval: Duration::from_millis(200),
        shutdown_grace: Duration::from_secs(2),
    };
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .maintenance(maintenance)
        .build();
    let engine = Arc::new(Engine::open(config).unwrap());
    engine.start_maintenance().unwrap();

    engine.put(b"a", b"1").unwrap();
    engine.put(b"b", b"2").unwrap();
    engine.delete(b"a").unwrap();

    thread::sleep(Duration::from_millis(2500));

    assert!(engine.header(b"a").is_none());
    assert_eq!(engine.get(b"b").unwrap(), Some(b"2".to_vec()));

    engine.shutdown().unwrap();
}

#[test]
fn test_engine_in_place_update_offsets_match_layout() {
    let (temp, engine) = setup_temp_engine();

    engine.put(b"key", b"abcdef").unwrap();
    let header = engine.header(b"key").unwrap();
    engine.update(b"key", b"XY").unwrap();
    drop(engine);

    let raw = std::fs::read(temp.path().join("data.bin")).unwrap();
    let start = (header.data_address + payload_offset(3)) as usize;
    assert_eq!(&raw[start..start + 6], b"XYcdef");
}
