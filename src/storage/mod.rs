//! Storage Module
//!
//! On-disk state: the data file, the header index and free-space tracking.
//!
//! ## Responsibilities
//! - Positional reads and writes of data blocks
//! - Startup scan that rebuilds the free set from inactive blocks
//! - Persisted, ordered key -> header mapping
//! - Best-fit reuse of released byte ranges
//!
//! ## Layout
//! ```text
//! {data_dir}/
//! ├── data.bin    ┌─────────┬─────────┬──────┬─────────┬─────┐
//! │               │ block A │ block B │ free │ block C │ ... │
//! │               └─────────┴─────────┴──────┴─────────┴─────┘
//! │                    ▲         ▲               ▲
//! └── index.idx   [len][header A][len][header B][len][header C] ...
//! ```
//!
//! None of these types take the engine-wide file lock themselves; the
//! [`Engine`](crate::Engine) decides who may touch the file and when.

mod allocator;
mod data_file;
mod index;

pub use allocator::{Allocation, FreeBlock, FreeSpaceAllocator};
pub use data_file::{DataFile, ScanReport, ScannedBlock};
pub use index::HeaderIndex;

/// A `(offset, length)` byte range in the data file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockExtent {
    pub address: u64,
    pub len: u64,
}

impl BlockExtent {
    pub fn new(address: u64, len: u64) -> Self {
        Self { address, len }
    }

    /// One past the last byte
    pub fn end(&self) -> u64 {
        self.address + self.len
    }
}
