//! Per-write options

use std::time::Duration;

use crate::record::{now_epoch_secs, NEVER_EXPIRES};

/// Optional attributes of a `put`
#[derive(Debug, Clone, PartialEq)]
pub struct PutOptions {
    /// Epoch seconds, or [`NEVER_EXPIRES`]
    pub expiry_time: i64,

    /// Stored in the header; used by vector search
    pub name_vector: Vec<f32>,

    /// Stored in the data block only
    pub data_vector: Option<Vec<f32>>,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self {
            expiry_time: NEVER_EXPIRES,
            name_vector: Vec::new(),
            data_vector: None,
        }
    }
}

impl PutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute expiry in epoch seconds
    pub fn expiry_time(mut self, expiry_time: i64) -> Self {
        self.expiry_time = expiry_time;
        self
    }

    /// Expire `ttl` from now (whole seconds)
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.expiry_time = now_epoch_secs() + ttl.as_secs() as i64;
        self
    }

    pub fn name_vector(mut self, vector: Vec<f32>) -> Self {
        self.name_vector = vector;
        self
    }

    pub fn data_vector(mut self, vector: Vec<f32>) -> Self {
        self.data_vector = Some(vector);
        self
    }
}
