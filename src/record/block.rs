//! Data block encoding
//!
//! A block duplicates the header's liveness and key so a reader can check
//! that the index and the file still agree.

use bytes::BufMut;

use crate::error::{Result, SlabError};
use crate::record::NEVER_EXPIRES;
use crate::wire::{put_f32_vec, put_len_prefixed, WireReader};

/// Separates the duplicated header from the payload
pub const HEADER_DATA_DELIMITER: &[u8; 15] = b"%%HEADER_DATA%%";

/// Introduces the optional data-vector section
pub const DATA_VECTOR_DELIMITER: &[u8; 15] = b"%%DATA_VECTOR%%";

/// Terminates every block
pub const RECORD_END_DELIMITER: &[u8; 14] = b"%%RECORD_END%%";

/// active (1) + expiry (8) + key_len (4)
pub const BLOCK_HEADER_FIXED_LEN: u64 = 1 + 8 + 4;

/// The duplicated header at the start of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub is_active: bool,
    pub expiry_time: i64,
    pub key: Vec<u8>,
}

/// Offset of the payload from the block start
pub fn payload_offset(key_len: usize) -> u64 {
    BLOCK_HEADER_FIXED_LEN + key_len as u64 + HEADER_DATA_DELIMITER.len() as u64
}

/// Bytes covering the sub-header, delimiter and a payload of `data_size`
pub fn prefix_len(key_len: usize, data_size: u32) -> u64 {
    payload_offset(key_len) + data_size as u64
}

/// Total encoded length of a block
pub fn block_len(key_len: usize, payload_len: usize, data_vector_len: Option<usize>) -> u64 {
    let vector = match data_vector_len {
        Some(n) => DATA_VECTOR_DELIMITER.len() as u64 + 4 + n as u64 * 4,
        None => 0,
    };
    payload_offset(key_len) + payload_len as u64 + vector + RECORD_END_DELIMITER.len() as u64
}

/// Smallest encodable block: empty key, empty payload, no data vector
pub const MIN_BLOCK_LEN: u64 = BLOCK_HEADER_FIXED_LEN
    + HEADER_DATA_DELIMITER.len() as u64
    + RECORD_END_DELIMITER.len() as u64;

/// Encode a full, active block
pub fn encode_block(
    key: &[u8],
    payload: &[u8],
    expiry_time: i64,
    data_vector: Option<&[f32]>,
) -> Vec<u8> {
    encode_padded_block(key, payload, expiry_time, data_vector, 0)
}

/// Encode an active block with `padding` zero bytes between the payload and
/// the tail, so it fills a slot longer than [`block_len`].
///
/// Readers bound the payload by `data_size` and never see the padding.
pub fn encode_padded_block(
    key: &[u8],
    payload: &[u8],
    expiry_time: i64,
    data_vector: Option<&[f32]>,
    padding: usize,
) -> Vec<u8> {
    let len = block_len(key.len(), payload.len(), data_vector.map(|v| v.len())) as usize + padding;
    let mut buf = Vec::with_capacity(len);

    buf.put_u8(1);
    buf.put_i64(expiry_time);
    put_len_prefixed(&mut buf, key);
    buf.put_slice(HEADER_DATA_DELIMITER);
    buf.put_slice(payload);
    buf.put_bytes(0, padding);

    if let Some(vector) = data_vector {
        buf.put_slice(DATA_VECTOR_DELIMITER);
        put_f32_vec(&mut buf, vector);
    }

    buf.put_slice(RECORD_END_DELIMITER);
    buf
}

/// Encode an inactive, keyless block covering exactly `len` bytes.
///
/// Written over the unused tail of a split free block so the startup scan
/// can step across it. `len` must be at least [`MIN_BLOCK_LEN`].
pub fn encode_filler_block(len: u64) -> Vec<u8> {
    let padding = len.saturating_sub(MIN_BLOCK_LEN) as usize;
    let mut buf = Vec::with_capacity(MIN_BLOCK_LEN as usize + padding);

    buf.put_u8(0);
    buf.put_i64(NEVER_EXPIRES);
    put_len_prefixed(&mut buf, &[]);
    buf.put_slice(HEADER_DATA_DELIMITER);
    buf.put_bytes(0, padding);
    buf.put_slice(RECORD_END_DELIMITER);
    buf
}

/// Decode the duplicated header and check the header/data delimiter.
///
/// Returns the header and the number of bytes consumed (the payload offset).
pub fn decode_block_header(bytes: &[u8], address: u64) -> Result<(BlockHeader, usize)> {
    let corrupt = |reason: String| SlabError::CorruptBlock { address, reason };
    let mut reader = WireReader::new(bytes);

    let active = reader.u8("is_active").map_err(|e| corrupt(e.to_string()))?;
    if active > 1 {
        return Err(corrupt(format!("invalid active flag 0x{:02x}", active)));
    }
    let expiry_time = reader.i64("expiry_time").map_err(|e| corrupt(e.to_string()))?;
    let key = reader
        .len_prefixed("key")
        .map_err(|e| corrupt(e.to_string()))?
        .to_vec();

    let delimiter = reader
        .bytes("header-data delimiter", HEADER_DATA_DELIMITER.len())
        .map_err(|e| corrupt(e.to_string()))?;
    if delimiter != HEADER_DATA_DELIMITER {
        return Err(corrupt("invalid header-data delimiter".to_string()));
    }

    let header = BlockHeader {
        is_active: active == 1,
        expiry_time,
        key,
    };
    Ok((header, reader.position()))
}

/// Decode the sub-header and return the first `data_size` payload bytes.
///
/// Bytes after the payload are never inspected; after an in-place shrink
/// they are stale.
pub fn decode_block_prefix(
    bytes: &[u8],
    address: u64,
    data_size: u32,
) -> Result<(BlockHeader, &[u8])> {
    let (header, offset) = decode_block_header(bytes, address)?;
    let end = offset + data_size as usize;
    if bytes.len() < end {
        return Err(SlabError::CorruptBlock {
            address,
            reason: format!(
                "payload truncated: expected {} bytes, got {}",
                data_size,
                bytes.len() - offset
            ),
        });
    }
    Ok((header, &bytes[offset..end]))
}
