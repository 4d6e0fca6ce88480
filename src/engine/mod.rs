//! Engine Module
//!
//! The storage engine that coordinates all components.
//!
//! ## Responsibilities
//! - Serve get/put/update/delete/find against the data file and index
//! - Keep the allocator, accountant and cache consistent with the index
//! - Rebuild free space from the data file on startup
//! - Own the background maintenance scheduler
//!
//! ## Read path
//! ```text
//! get(key) ──► cache hit? ──yes──► value
//!                  │ no
//!                  ▼
//!        [file read lock] index lookup ──► absent/inactive/expired ──► None
//!                  │
//!                  ▼
//!        read prefix (sub-header + data_size bytes), validate, cache
//! ```
//!
//! ## Write path (put)
//! ```text
//! reserve memory ──► [file write lock] tombstone old header ──► allocate
//!                    (best fit or append) ──► write block ──► install header
//! ```

mod backup;
mod options;
mod stats;

pub use backup::{BackupManifest, DATA_BACKUP_FILENAME, INDEX_BACKUP_FILENAME, MANIFEST_FILENAME};
pub use options::PutOptions;
pub use stats::{CompactionReport, DefragmentationReport, EngineStats};

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::cache::ReadCache;
use crate::config::Config;
use crate::error::{display_key, Result, SlabError};
use crate::memory::{cache_charge, put_charge, MemoryAccountant};
use crate::protocol::{Command, Response};
use crate::query::SearchQuery;
use crate::record::{
    block_len, decode_block_prefix, encode_filler_block, encode_padded_block, now_epoch_millis,
    now_epoch_secs, payload_offset, prefix_len, HeaderRecord, MIN_BLOCK_LEN,
};
use crate::sql::{SqlProcessor, SqlQuery, SqlResult};
use crate::storage::{BlockExtent, DataFile, FreeSpaceAllocator, HeaderIndex};
use crate::tasks::{self, Scheduler};

/// The main storage engine
///
/// ## Concurrency Model
///
/// - One engine-wide `RwLock` guards the data file. `get`, `find`, `stats`
///   and `backup` take it shared; `put`, `update`, `delete`, expiry
///   collection and compaction take it exclusive.
/// - The index, allocator, accountant and cache synchronize internally, so
///   background tasks and request threads can touch them independently.
/// - Lock acquisition has no timeout; a stalled writer blocks all readers.
///
/// ## Failure Model
///
/// There is no rollback. A `put` that fails after tombstoning the previous
/// header leaves the key with no active record.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Data blocks (engine-wide reader/writer lock)
    file: RwLock<DataFile>,

    /// Authoritative key -> header mapping (internal RwLock)
    index: HeaderIndex,

    /// Reusable byte ranges of the data file (internal Mutex)
    allocator: FreeSpaceAllocator,

    /// Shared memory quota, also held by the cache
    accountant: Arc<MemoryAccountant>,

    /// Keys loaded at open whose reservation did not fit under the limit
    unreserved: Mutex<HashSet<Vec<u8>>>,

    /// Lookaside cache of decoded values (internal RwLock)
    cache: ReadCache,

    /// Schema registry behind the SQL commands
    sql: SqlProcessor,

    /// Running maintenance tasks, if started
    scheduler: Mutex<Option<Scheduler>>,
}

impl Engine {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const DATA_FILENAME: &'static str = "data.bin";
    const INDEX_FILENAME: &'static str = "index.idx";

    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Create the data directory
    /// 2. Open the data file and load the index
    /// 3. Scan the data file and free every inactive block
    /// 4. Re-reserve memory for the live records
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Create data directory if it doesn't exist
        fs::create_dir_all(&config.data_dir)?;

        let data_path = config.data_dir.join(Self::DATA_FILENAME);
        let index_path = config.data_dir.join(Self::INDEX_FILENAME);

        let accountant = Arc::new(MemoryAccountant::new(config.memory_limit)?);
        accountant.set_enabled(config.memory_limit_enabled);

        // Step 2: Open files
        let file = DataFile::open(&data_path, config.max_data_file_size)?;
        let index = HeaderIndex::open(&index_path)?;

        // Step 3: Rebuild free space; a split tail must hold at least an empty block
        let allocator = FreeSpaceAllocator::with_min_split(MIN_BLOCK_LEN);
        Self::rebuild_free_space(&file, &index, &allocator)?;

        // Step 4: Live records keep their reservation for as long as they live
        let mut unreserved = HashSet::new();
        index.for_each(|header| {
            if header.is_active {
                let charge = put_charge(header.key.len(), header.data_size as usize, header.name_vector.len(), 0);
                if !accountant.allocate(charge) {
                    unreserved.insert(header.key.clone());
                }
            }
        });
        if !unreserved.is_empty() {
            tracing::warn!(
                "Memory limit reached while loading; {} live records are not reserved",
                unreserved.len()
            );
        }

        let cache = ReadCache::new(config.cache_ttl, Arc::clone(&accountant));

        tracing::info!(
            "Engine opened at {:?}: {} headers, {} data bytes, {} free blocks ({} bytes)",
            config.data_dir,
            index.len(),
            file.len(),
            allocator.block_count(),
            allocator.total_free()
        );

        Ok(Self {
            config,
            file: RwLock::new(file),
            index,
            allocator,
            accountant,
            unreserved: Mutex::new(unreserved),
            cache,
            sql: SqlProcessor::new(),
            scheduler: Mutex::new(None),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    fn rebuild_free_space(
        file: &DataFile,
        index: &HeaderIndex,
        allocator: &FreeSpaceAllocator,
    ) -> Result<()> {
        let report = file.scan()?;
        if !report.complete {
            tracing::warn!(
                "Data file scan stopped at offset {} of {}; the rest is not reused",
                report.stopped_at,
                file.len()
            );
        }

        // Free space must never cover the start of a live block
        let mut live = BTreeSet::new();
        index.for_each(|header| {
            if header.is_active {
                live.insert(header.data_address);
            }
        });

        for extent in report.inactive_extents() {
            if live.range(extent.address..extent.end()).next().is_some() {
                tracing::warn!(
                    "Inactive block at {} overlaps a live record; not reused",
                    extent.address
                );
                continue;
            }
            allocator.release(extent.address, extent.len);
        }
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start the background maintenance tasks (idempotent)
    pub fn start_maintenance(self: &Arc<Self>) -> Result<()> {
        let mut slot = self.scheduler.lock();
        if slot.is_some() {
            return Ok(());
        }

        let scheduler = tasks::maintenance_scheduler(Arc::downgrade(self), &self.config.maintenance)?;
        tracing::info!("Started {} maintenance tasks", scheduler.task_count());
        *slot = Some(scheduler);
        Ok(())
    }

    /// Stop maintenance, rewrite the index and sync the data file
    pub fn shutdown(&self) -> Result<()> {
        let scheduler = self.scheduler.lock().take();
        if let Some(mut scheduler) = scheduler {
            scheduler.shutdown();
        }

        let file = self.file.write();
        self.index.persist()?;
        file.sync()?;

        tracing::info!("Engine at {:?} shut down", self.config.data_dir);
        Ok(())
    }

    // =========================================================================
    // Command Dispatch
    // =========================================================================

    /// Execute a protocol command
    ///
    /// Engine errors are returned as `Err`; the caller turns them into an
    /// error response.
    pub fn execute(&self, command: Command) -> Result<Response> {
        match command {
            Command::Put {
                key,
                value,
                options,
            } => {
                self.put_with(&key, &value, options)?;
                Ok(Response::ok("Data stored successfully"))
            }
            Command::Get { key } => match self.get(&key)? {
                Some(value) => Ok(Response::ok("Data retrieved successfully").with_data(value)),
                None => Ok(Response::error("Key not found or expired")),
            },
            Command::Update { key, value } => {
                self.update(&key, &value)?;
                Ok(Response::ok("Data updated successfully"))
            }
            Command::Delete { key } => {
                self.delete(&key)?;
                Ok(Response::ok("Data deleted successfully"))
            }
            Command::Find { query } => {
                let results = self.find(&query)?;
                Ok(Response::ok("Search completed").with_results(results))
            }
            Command::Ping => Ok(Response::ok("PONG")),
            Command::Stats => Ok(Response::ok("System statistics").with_stats(self.stats())),
            Command::Sql { query: Some(query), .. } => {
                let result = self.execute_sql(&query);
                Ok(Response::from_sql(result))
            }
            Command::Sql { query: None, .. } => {
                Ok(Response::error("SQL query is required for SQL commands"))
            }
        }
    }

    /// Run a request against the SQL schema registry
    pub fn execute_sql(&self, query: &SqlQuery) -> SqlResult {
        self.sql.execute(query)
    }

    // =========================================================================
    // Core Operations
    // =========================================================================

    /// Get a value by key
    ///
    /// Returns `None` for absent, tombstoned or expired keys.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        check_key(key)?;

        if let Some(value) = self.cache.get(key) {
            tracing::trace!("Cache hit for '{}'", display_key(key));
            return Ok(Some(value));
        }

        let file = self.file.read();
        let header = match self.index.get(key) {
            Some(header) if header.is_live_at(now_epoch_secs()) => header,
            _ => return Ok(None),
        };
        let value = self.read_payload(&file, &header)?;

        // Cached under the read lock so a writer cannot interleave a stale insert
        let charge = cache_charge(key.len(), value.len(), header.name_vector.len());
        if self.accountant.allocate(charge) {
            self.cache.put(key.to_vec(), value.clone(), header, charge);
        } else {
            tracing::warn!(
                "Skipping cache for '{}': {} bytes over memory limit",
                display_key(key),
                charge
            );
        }

        Ok(Some(value))
    }

    /// Put a key-value pair that never expires
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.put_with(key, value, PutOptions::default())
    }

    /// Put a key-value pair with expiry and vectors
    ///
    /// Steps:
    /// 1. Reserve memory (fails with `MemoryLimitExceeded`, nothing written)
    /// 2. Tombstone the active header for `key`, if any
    /// 3. Allocate a free block or append
    /// 4. Write the block and install the new header
    pub fn put_with(&self, key: &[u8], value: &[u8], options: PutOptions) -> Result<()> {
        check_key(key)?;
        check_value(value)?;

        let data_vector_len = options.data_vector.as_ref().map_or(0, |v| v.len());
        let charge = put_charge(key.len(), value.len(), options.name_vector.len(), data_vector_len);
        self.reserve(charge)?;

        let mut file = self.file.write();
        let result = self.put_locked(
            &mut file,
            key,
            value,
            options.expiry_time,
            options.name_vector,
            options.data_vector.as_deref(),
        );

        match result {
            Ok(header) => {
                // Only the header is accounted for from here on
                self.accountant.release(data_vector_len as u64 * 4);
                tracing::debug!(
                    "Put '{}' ({} bytes) at {}",
                    display_key(key),
                    value.len(),
                    header.data_address
                );
                Ok(())
            }
            Err(e) => {
                self.accountant.release(charge);
                Err(e)
            }
        }
    }

    /// Replace the value of an active key
    ///
    /// A value no longer than the current `data_size` is patched in place and
    /// keeps its `data_address`. A longer value is relocated through the put
    /// path, preserving expiry and name vector.
    pub fn update(&self, key: &[u8], value: &[u8]) -> Result<()> {
        check_key(key)?;
        check_value(value)?;

        let mut file = self.file.write();
        let old = match self.index.get(key) {
            Some(header) if header.is_active => header,
            _ => return Err(SlabError::KeyNotFound(display_key(key))),
        };

        if value.len() <= old.data_size as usize {
            let offset = old.data_address + payload_offset(key.len());
            file.write_at(offset, value)
                .map_err(|source| SlabError::WriteFailure {
                    key: display_key(key),
                    source,
                })?;

            let header = HeaderRecord::new(
                key.to_vec(),
                old.data_address,
                value.len() as u32,
                old.expiry_time,
                old.name_vector.clone(),
            );
            self.index.insert(header.clone())?;
            if !self.unreserved.lock().contains(key) {
                self.accountant.release(old.data_size as u64 - value.len() as u64);
            }
            self.cache_written(key, value, header);

            tracing::debug!("Updated '{}' in place at {}", display_key(key), old.data_address);
            return Ok(());
        }

        let charge = put_charge(key.len(), value.len(), old.name_vector.len(), 0);
        self.reserve(charge)?;
        match self.put_locked(&mut file, key, value, old.expiry_time, old.name_vector, None) {
            Ok(header) => {
                tracing::debug!(
                    "Updated '{}' by relocating {} -> {}",
                    display_key(key),
                    old.data_address,
                    header.data_address
                );
                Ok(())
            }
            Err(e) => {
                self.accountant.release(charge);
                Err(e)
            }
        }
    }

    /// Delete a key (no-op when absent or already inactive)
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        check_key(key)?;

        let mut file = self.file.write();
        match self.index.get(key) {
            Some(header) if header.is_active => {
                self.retire_locked(&mut file, &header, "delete")?;
                tracing::debug!("Deleted '{}'", display_key(key));
            }
            _ => {
                self.cache.remove(key);
            }
        }
        Ok(())
    }

    /// Values of every live record matching `query`, in key order
    ///
    /// Keys are collected under the read lock, then each value goes through
    /// [`get`](Self::get), so a record removed in between is skipped.
    pub fn find(&self, query: &SearchQuery) -> Result<Vec<Vec<u8>>> {
        let keys = {
            let _file = self.file.read();
            let now = now_epoch_secs();
            let mut keys = Vec::new();
            self.index.for_each(|header| {
                if header.is_live_at(now) && query.matches(header) {
                    keys.push(header.key.clone());
                }
            });
            keys
        };

        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(&key)? {
                values.push(value);
            }
        }

        tracing::debug!("Find {:?} matched {} records", query, values.len());
        Ok(values)
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Collect expired tombstones and coalesce free blocks.
    ///
    /// Live blocks are never moved and the file never shrinks.
    pub fn compact(&self) -> Result<CompactionReport> {
        let _file = self.file.write();
        let expired_removed = self.collect_expired_locked()?;
        let blocks_merged = self.allocator.merge_adjacent();

        tracing::info!(
            "Compaction removed {} expired headers, merged {} free blocks",
            expired_removed,
            blocks_merged
        );
        Ok(CompactionReport {
            expired_removed,
            blocks_merged,
        })
    }

    /// Remove tombstoned headers whose expiry has passed
    pub fn collect_expired(&self) -> Result<usize> {
        let _file = self.file.write();
        self.collect_expired_locked()
    }

    fn collect_expired_locked(&self) -> Result<usize> {
        let now = now_epoch_secs();
        let removed = self
            .index
            .remove_where(|header| !header.is_active && header.is_expired_at(now))?;
        if !removed.is_empty() {
            tracing::info!("Expiry collection removed {} headers", removed.len());
        }
        Ok(removed.len())
    }

    /// Coalesce adjacent free blocks; returns how many were folded
    pub fn merge_free_blocks(&self) -> usize {
        let merged = self.allocator.merge_adjacent();
        if merged > 0 {
            tracing::debug!("Merged {} adjacent free blocks", merged);
        }
        merged
    }

    /// Report fragmentation; nothing on disk changes
    pub fn defragmentation_report(&self) -> DefragmentationReport {
        let file = self.file.read();
        let report = DefragmentationReport {
            free_blocks: self.allocator.block_count(),
            free_bytes: self.allocator.total_free(),
            file_size: file.len(),
        };
        tracing::info!(
            "Defragmentation cycle completed - free blocks: {}, total free space: {} bytes ({:.1}% of file)",
            report.free_blocks,
            report.free_bytes,
            report.free_ratio() * 100.0
        );
        report
    }

    /// Evict stale cache entries; returns how many were evicted
    pub fn sweep_cache(&self) -> usize {
        self.cache.sweep()
    }

    // =========================================================================
    // Backup
    // =========================================================================

    /// Copy the data and index files into `dir` and write a manifest
    ///
    /// The shared lock spans the whole copy, so no write lands mid-copy.
    pub fn backup(&self, dir: impl AsRef<Path>) -> Result<BackupManifest> {
        let dir = dir.as_ref();
        let file = self.file.read();

        fs::create_dir_all(dir)?;
        file.sync()?;

        let (data_len, data_crc) =
            backup::copy_with_checksum(file.path(), &dir.join(DATA_BACKUP_FILENAME))?;
        let (index_len, index_crc) =
            backup::copy_with_checksum(self.index.path(), &dir.join(INDEX_BACKUP_FILENAME))?;

        let manifest = BackupManifest {
            created_at: now_epoch_millis(),
            data_len,
            data_crc,
            index_len,
            index_crc,
        };
        manifest.write_to(dir)?;

        tracing::info!(
            "Backup to {:?} completed ({} data bytes, {} index bytes)",
            dir,
            data_len,
            index_len
        );
        Ok(manifest)
    }

    /// Check a backup directory against its manifest
    pub fn verify_backup(dir: impl AsRef<Path>) -> Result<BackupManifest> {
        BackupManifest::verify(dir.as_ref())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn stats(&self) -> EngineStats {
        let file_size = self.file.read().len();
        EngineStats {
            index_size: self.index.len(),
            file_size,
            free_blocks: self.allocator.block_count(),
            free_bytes: self.allocator.total_free(),
            used_memory: self.accountant.used(),
            max_memory: self.accountant.max(),
            memory_ratio: self.accountant.usage_ratio(),
            cache_size: self.cache.len(),
        }
    }

    /// Current header for `key`, active or tombstoned
    pub fn header(&self, key: &[u8]) -> Option<HeaderRecord> {
        self.index.get(key)
    }

    pub fn set_cache_ttl(&self, ttl: Duration) {
        self.cache.set_ttl(ttl);
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Switch between enforced and soft memory accounting
    pub fn set_memory_limit_enabled(&self, enabled: bool) {
        self.accountant.set_enabled(enabled);
    }

    pub fn memory(&self) -> &MemoryAccountant {
        &self.accountant
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    pub fn data_path(&self) -> PathBuf {
        self.config.data_dir.join(Self::DATA_FILENAME)
    }

    pub fn index_path(&self) -> PathBuf {
        self.config.data_dir.join(Self::INDEX_FILENAME)
    }

    // =========================================================================
    // Internals (file lock held by caller)
    // =========================================================================

    fn reserve(&self, charge: u64) -> Result<()> {
        if self.accountant.allocate(charge) {
            Ok(())
        } else {
            Err(SlabError::MemoryLimitExceeded {
                required: charge,
                available: self.accountant.available(),
            })
        }
    }

    fn put_locked(
        &self,
        file: &mut DataFile,
        key: &[u8],
        value: &[u8],
        expiry_time: i64,
        name_vector: Vec<f32>,
        data_vector: Option<&[f32]>,
    ) -> Result<HeaderRecord> {
        if let Some(old) = self.index.get(key).filter(|h| h.is_active) {
            self.retire_locked(file, &old, "put")?;
        }

        let len = block_len(key.len(), value.len(), data_vector.map(|v| v.len()));
        let reused = self.allocator.allocate_extent(len);
        let (address, slot_len) = match reused {
            Some(allocation) => (allocation.extent.address, allocation.extent.len),
            None => (file.len(), len),
        };

        // A slot handed out whole is padded so the block's tail ends the slot
        let block = encode_padded_block(key, value, expiry_time, data_vector, (slot_len - len) as usize);
        if let Err(source) = file.write_at(address, &block) {
            if reused.is_some() {
                self.allocator.release(address, slot_len);
            }
            return Err(SlabError::WriteFailure {
                key: display_key(key),
                source,
            });
        }

        if let Some(remainder) = reused.and_then(|allocation| allocation.remainder) {
            if let Err(e) = file.write_at(remainder.address, &encode_filler_block(remainder.len)) {
                tracing::warn!(
                    "Failed to mark free block at {} ({} bytes): {}; startup scan will stop there",
                    remainder.address,
                    remainder.len,
                    e
                );
            }
        }

        let header = HeaderRecord::new(key.to_vec(), address, value.len() as u32, expiry_time, name_vector);
        self.index.insert(header.clone())?;
        self.cache_written(key, value, header.clone());
        Ok(header)
    }

    /// Cache a freshly written value unless its record is already expired
    fn cache_written(&self, key: &[u8], value: &[u8], header: HeaderRecord) {
        if header.is_expired_at(now_epoch_secs()) {
            self.cache.remove(key);
            return;
        }
        self.cache.put(key.to_vec(), value.to_vec(), header, 0);
    }

    /// Tombstone `header` and give its block and reservation back
    fn retire_locked(&self, file: &mut DataFile, header: &HeaderRecord, operation: &'static str) -> Result<()> {
        self.index.insert(header.tombstone())?;
        self.cache.remove(&header.key);

        // The block may be longer than its payload implies (vector, padding, shrink)
        let extent = match file.block_extent(header.data_address, header.key.len(), header.data_size) {
            Ok(Some(extent)) => extent,
            Ok(None) | Err(_) => {
                tracing::warn!(
                    "No block tail found for '{}' at {}; freeing the payload length only",
                    display_key(&header.key),
                    header.data_address
                );
                BlockExtent::new(
                    header.data_address,
                    block_len(header.key.len(), header.data_size as usize, None),
                )
            }
        };
        self.allocator.release(extent.address, extent.len);

        // Records loaded without a reservation have nothing to give back
        if !self.unreserved.lock().remove(&header.key) {
            self.accountant.release(put_charge(
                header.key.len(),
                header.data_size as usize,
                header.name_vector.len(),
                0,
            ));
        }

        file.set_active_flag(header.data_address, false)
            .map_err(|e| SlabError::io_failure(operation, &header.key, e))
    }

    fn read_payload(&self, file: &DataFile, header: &HeaderRecord) -> Result<Vec<u8>> {
        let extent = BlockExtent::new(header.data_address, prefix_len(header.key.len(), header.data_size));
        let bytes = file.read_at(extent).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                SlabError::CorruptBlock {
                    address: header.data_address,
                    reason: e.to_string(),
                }
            } else {
                SlabError::io_failure("get", &header.key, e)
            }
        })?;

        let (block, payload) = decode_block_prefix(&bytes, header.data_address, header.data_size)?;
        if block.key != header.key {
            return Err(SlabError::CorruptBlock {
                address: header.data_address,
                reason: format!(
                    "key mismatch: index has '{}', block has '{}'",
                    display_key(&header.key),
                    display_key(&block.key)
                ),
            });
        }
        if block.is_active != header.is_active {
            return Err(SlabError::CorruptBlock {
                address: header.data_address,
                reason: "active flag does not match the index".to_string(),
            });
        }

        Ok(payload.to_vec())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(mut scheduler) = self.scheduler.get_mut().take() {
            scheduler.shutdown();
        }
        if let Err(e) = self.file.get_mut().sync() {
            tracing::warn!("Failed to sync data file on drop: {}", e);
        }
    }
}

fn check_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(SlabError::InvalidArgument("key must not be empty".to_string()));
    }
    if key.len() > u32::MAX as usize {
        return Err(SlabError::InvalidArgument("key longer than 4 GiB".to_string()));
    }
    Ok(())
}

fn check_value(value: &[u8]) -> Result<()> {
    if value.len() > u32::MAX as usize {
        return Err(SlabError::InvalidArgument("value longer than 4 GiB".to_string()));
    }
    Ok(())
}
