//! Configuration for SlabKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Default memory quota (100 MB)
pub const DEFAULT_MEMORY_LIMIT: u64 = 100 * 1024 * 1024;

/// Largest accepted memory quota (100 GB)
pub const MAX_MEMORY_LIMIT: u64 = 100 * 1024 * 1024 * 1024;

/// Main configuration for a SlabKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── data.bin     (data blocks)
    ///     └── index.idx    (header index, rewritten on every mutation)
    pub data_dir: PathBuf,

    /// Hard cap on the data file length; writes past it fail
    pub max_data_file_size: Option<u64>,

    // -------------------------------------------------------------------------
    // Memory Configuration
    // -------------------------------------------------------------------------
    /// Byte quota shared by writes and cache insertions
    pub memory_limit: u64,

    /// When false the quota is only tracked, never enforced
    pub memory_limit_enabled: bool,

    /// Lifetime of read-cache entries
    pub cache_ttl: Duration,

    // -------------------------------------------------------------------------
    // Maintenance Configuration
    // -------------------------------------------------------------------------
    pub maintenance: MaintenanceConfig,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

/// Intervals of the background maintenance tasks.
///
/// A zero interval disables the corresponding task.
#[derive(Debug, Clone, Copy)]
pub struct MaintenanceConfig {
    /// Removes tombstoned, expired headers from the index
    pub expiry_collection_interval: Duration,

    /// Coalesces adjacent free blocks
    pub free_block_merge_interval: Duration,

    /// Logs fragmentation figures
    pub defragmentation_interval: Duration,

    /// Logs memory usage when it runs high
    pub memory_log_interval: Duration,

    /// Reacts to memory pressure
    pub memory_monitor_interval: Duration,

    /// Evicts stale cache entries
    pub cache_sweep_interval: Duration,

    /// How long shutdown waits for running tasks
    pub shutdown_grace: Duration,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            expiry_collection_interval: Duration::from_secs(60 * 60),
            free_block_merge_interval: Duration::from_secs(30 * 60),
            defragmentation_interval: Duration::from_secs(6 * 60 * 60),
            memory_log_interval: Duration::from_secs(5 * 60),
            memory_monitor_interval: Duration::from_secs(60),
            cache_sweep_interval: Duration::from_secs(60 * 60),
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./slabkv_data"),
            max_data_file_size: None,
            memory_limit: DEFAULT_MEMORY_LIMIT,
            memory_limit_enabled: true,
            cache_ttl: Duration::from_secs(3600),
            maintenance: MaintenanceConfig::default(),
            listen_addr: "127.0.0.1:7070".to_string(),
            max_connections: 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Cap the data file length (in bytes)
    pub fn max_data_file_size(mut self, bytes: u64) -> Self {
        self.config.max_data_file_size = Some(bytes);
        self
    }

    /// Set the memory quota (in bytes)
    pub fn memory_limit(mut self, bytes: u64) -> Self {
        self.config.memory_limit = bytes;
        self
    }

    /// Enable or disable quota enforcement
    pub fn memory_limit_enabled(mut self, enabled: bool) -> Self {
        self.config.memory_limit_enabled = enabled;
        self
    }

    /// Set the read-cache TTL
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Replace all maintenance intervals
    pub fn maintenance(mut self, maintenance: MaintenanceConfig) -> Self {
        self.config.maintenance = maintenance;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
