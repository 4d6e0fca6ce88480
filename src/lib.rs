//! # SlabKV
//!
//! An embeddable key-value storage engine with:
//! - A single append-and-reuse data file of self-describing blocks
//! - A persisted, ordered header index (one header per key)
//! - Best-fit reuse of released space with adjacent-block coalescing
//! - Optional expiry, exact/mask/vector search and a read cache
//! - A byte quota shared by writes and cached reads
//! - Background maintenance and a TCP client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Multiple Clients)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command / Response frames
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │       (file RwLock: writers exclusive, readers shared)       │
//! └──────┬──────────────┬──────────────┬──────────────┬─────────┘
//!        │              │              │              │
//!        ▼              ▼              ▼              ▼
//!  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐
//!  │ DataFile  │  │  Header   │  │ FreeSpace │  │ ReadCache │
//!  │ (blocks)  │  │  Index    │  │ Allocator │  │   (TTL)   │
//!  └───────────┘  └───────────┘  └───────────┘  └─────┬─────┘
//!                                                     │
//!                                ┌────────────────────▼──────┐
//!                                │     MemoryAccountant      │
//!                                └───────────────────────────┘
//!
//!  Scheduler ── expiry collection, free-block merging,
//!               defragmentation reports, memory watch, cache sweep
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod wire;

pub mod cache;
pub mod engine;
pub mod memory;
pub mod query;
pub mod record;
pub mod storage;
pub mod tasks;

pub mod network;
pub mod protocol;
pub mod sql;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{Config, MaintenanceConfig};
pub use engine::{Engine, EngineStats, PutOptions};
pub use error::{Result, SlabError};
pub use query::SearchQuery;
pub use record::HeaderRecord;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SlabKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
