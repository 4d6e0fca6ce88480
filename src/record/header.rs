//! Header record encoding
//!
//! One header per logical key; the authoritative location metadata.

use bytes::BufMut;

use crate::error::{Result, SlabError};
use crate::wire::{put_f32_vec, put_len_prefixed, WireReader};

use super::{now_epoch_millis, now_epoch_secs};

/// Expiry sentinel: the record never expires
pub const NEVER_EXPIRES: i64 = -1;

/// Fixed part of an encoded header: active + expiry + key_len + address + size + vec_len
const FIXED_LEN: usize = 1 + 8 + 4 + 8 + 4 + 4;

/// Location and liveness metadata for one key
#[derive(Debug, Clone)]
pub struct HeaderRecord {
    /// False once the record is deleted or superseded
    pub is_active: bool,

    /// Epoch seconds, or [`NEVER_EXPIRES`]
    pub expiry_time: i64,

    /// The record key (index ordering key)
    pub key: Vec<u8>,

    /// Byte offset of the data block in the data file
    pub data_address: u64,

    /// Payload length (excludes delimiters and sub-header)
    pub data_size: u32,

    /// Similarity-search vector; empty when absent
    pub name_vector: Vec<f32>,

    /// Creation time of this header object (epoch millis, not persisted)
    pub timestamp: u64,
}

impl PartialEq for HeaderRecord {
    fn eq(&self, other: &Self) -> bool {
        self.is_active == other.is_active
            && self.expiry_time == other.expiry_time
            && self.key == other.key
            && self.data_address == other.data_address
            && self.data_size == other.data_size
            && self.name_vector == other.name_vector
    }
}

impl HeaderRecord {
    /// Create an active header
    pub fn new(
        key: Vec<u8>,
        data_address: u64,
        data_size: u32,
        expiry_time: i64,
        name_vector: Vec<f32>,
    ) -> Self {
        Self {
            is_active: true,
            expiry_time,
            key,
            data_address,
            data_size,
            name_vector,
            timestamp: now_epoch_millis(),
        }
    }

    /// A fresh inactive copy whose expiry is `now`, so the collector can drop it
    pub fn tombstone(&self) -> Self {
        Self {
            is_active: false,
            expiry_time: now_epoch_secs(),
            key: self.key.clone(),
            data_address: self.data_address,
            data_size: self.data_size,
            name_vector: self.name_vector.clone(),
            timestamp: now_epoch_millis(),
        }
    }

    /// True when the expiry is set and lies strictly before `now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expiry_time != NEVER_EXPIRES && self.expiry_time < now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_epoch_secs())
    }

    /// Active and not expired at `now`
    pub fn is_live_at(&self, now: i64) -> bool {
        self.is_active && !self.is_expired_at(now)
    }

    /// Length of [`encode`](Self::encode)'s output
    pub fn encoded_len(&self) -> usize {
        FIXED_LEN + self.key.len() + self.name_vector.len() * 4
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }

    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.is_active as u8);
        buf.put_i64(self.expiry_time);
        put_len_prefixed(buf, &self.key);
        buf.put_u64(self.data_address);
        buf.put_u32(self.data_size);
        put_f32_vec(buf, &self.name_vector);
    }

    /// Decode one header; trailing bytes are rejected
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(bytes);
        let corrupt = |e: crate::wire::Truncated| SlabError::CorruptIndex(e.to_string());

        let is_active = reader.u8("is_active").map_err(corrupt)? == 1;
        let expiry_time = reader.i64("expiry_time").map_err(corrupt)?;
        let key = reader.len_prefixed("key").map_err(corrupt)?.to_vec();
        let data_address = reader.u64("data_address").map_err(corrupt)?;
        let data_size = reader.u32("data_size").map_err(corrupt)?;
        let name_vector = reader.f32_vec("name_vector").map_err(corrupt)?;

        if !reader.is_empty() {
            return Err(SlabError::CorruptIndex(format!(
                "{} trailing bytes after header record",
                reader.remaining()
            )));
        }

        Ok(Self {
            is_active,
            expiry_time,
            key,
            data_address,
            data_size,
            name_vector,
            timestamp: now_epoch_millis(),
        })
    }
}
