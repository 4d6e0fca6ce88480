//! Error types for SlabKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SlabError
pub type Result<T> = std::result::Result<T, SlabError>;

/// Unified error type for SlabKV operations
#[derive(Debug, Error)]
pub enum SlabError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO failure during {operation} for key '{key}': {source}")]
    IoFailure {
        operation: &'static str,
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write data block for key '{key}': {source}")]
    WriteFailure {
        key: String,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Memory limit exceeded. Required: {required}, Available: {available}")]
    MemoryLimitExceeded { required: u64, available: u64 },

    // -------------------------------------------------------------------------
    // Integrity Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt data block at address {address}: {reason}")]
    CorruptBlock { address: u64, reason: String },

    #[error("Index corruption: {0}")]
    CorruptIndex(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Backup error: {0}")]
    Backup(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SlabError {
    /// Attach the key and operation to a raw I/O error
    pub(crate) fn io_failure(operation: &'static str, key: &[u8], source: std::io::Error) -> Self {
        SlabError::IoFailure {
            operation,
            key: display_key(key),
            source,
        }
    }
}

/// Render a binary key for error messages and logs
pub fn display_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}
