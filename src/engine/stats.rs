//! Engine statistics and maintenance reports

/// Point-in-time engine figures
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineStats {
    /// Headers in the index, tombstones included
    pub index_size: usize,

    /// Data file length in bytes
    pub file_size: u64,

    /// Number of free blocks
    pub free_blocks: usize,

    /// Sum of free block sizes
    pub free_bytes: u64,

    pub used_memory: u64,
    pub max_memory: u64,

    /// `used_memory / max_memory`
    pub memory_ratio: f64,

    /// Entries in the read cache
    pub cache_size: usize,
}

/// Result of [`Engine::compact`](super::Engine::compact)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompactionReport {
    /// Tombstoned, expired headers removed from the index
    pub expired_removed: usize,

    /// Free blocks folded into a neighbour
    pub blocks_merged: usize,
}

/// Fragmentation figures; nothing is moved on disk
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DefragmentationReport {
    pub free_blocks: usize,
    pub free_bytes: u64,
    pub file_size: u64,
}

impl DefragmentationReport {
    /// Share of the data file that is free, 0.0 for an empty file
    pub fn free_ratio(&self) -> f64 {
        if self.file_size == 0 {
            0.0
        } else {
            self.free_bytes as f64 / self.file_size as f64
        }
    }
}
