//! Record Codec Module
//!
//! Bit-exact, big-endian encoding of header records and data blocks.
//!
//! ## Header Record (index file entry payload)
//! ```text
//! ┌──────────┬───────────┬───────────┬─────┬────────────┬───────────┬──────────┬──────────────┐
//! │Active (1)│ Expiry (8)│ KeyLen (4)│ Key │ Address (8)│ Size (4)  │ VecLen(4)│ f32 * VecLen │
//! └──────────┴───────────┴───────────┴─────┴────────────┴───────────┴──────────┴──────────────┘
//! ```
//!
//! ## Data Block (data file, at `data_address`)
//! ```text
//! ┌──────────┬───────────┬───────────┬─────┬─────────────────┬─────────┐
//! │Active (1)│ Expiry (8)│ KeyLen (4)│ Key │ %%HEADER_DATA%% │ Payload │ ...
//! └──────────┴───────────┴───────────┴─────┴─────────────────┴─────────┘
//!   ... [ %%DATA_VECTOR%% │ VecLen (4) │ f32 * VecLen ] │ %%RECORD_END%% │
//! ```
//!
//! The payload length is not stored in the block; readers bound the payload
//! by the index header's `data_size`.

mod block;
mod header;

pub use block::{
    block_len, decode_block_header, decode_block_prefix, encode_block, encode_filler_block, encode_padded_block,
    payload_offset, prefix_len, BlockHeader, BLOCK_HEADER_FIXED_LEN, DATA_VECTOR_DELIMITER, HEADER_DATA_DELIMITER,
    MIN_BLOCK_LEN, RECORD_END_DELIMITER,
};
pub use header::{HeaderRecord, NEVER_EXPIRES};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as epoch seconds
pub fn now_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Current time as epoch milliseconds
pub fn now_epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
