use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::config::MAX_MEMORY_LIMIT;
use crate::error::{Result, SlabError};

/// Usage ratio above which the periodic logger warns
pub const LOG_RATIO: f64 = 0.80;

/// Usage ratio above which the monitor asks for reclamation
pub const HIGH_RATIO: f64 = 0.90;

/// Usage ratio above which the monitor warns
pub const CRITICAL_RATIO: f64 = 0.95;

/// Coarse classification of [`MemoryAccountant::usage_ratio`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryPressure {
    Normal,
    High,
    Critical,
}

/// Thread-safe `(used, max)` counter
#[derive(Debug)]
pub struct MemoryAccountant {
    used: Mutex<u64>,
    max: u64,
    enabled: AtomicBool,
}

impl MemoryAccountant {
    /// Create an accountant with quota `max` (1 byte ..= 100 GB)
    pub fn new(max: u64) -> Result<Self> {
        if max == 0 || max > MAX_MEMORY_LIMIT {
            return Err(SlabError::Config(format!(
                "memory limit must be between 1 and {} bytes, got {}",
                MAX_MEMORY_LIMIT, max
            )));
        }

        Ok(Self {
            used: Mutex::new(0),
            max,
            enabled: AtomicBool::new(true),
        })
    }

    /// Reserve `bytes`; false when enforcement is on and the quota is short
    pub fn allocate(&self, bytes: u64) -> bool {
        let mut used = self.used.lock();
        if !self.is_enabled() {
            *used = used.saturating_add(bytes);
            return true;
        }

        match used.checked_add(bytes) {
            Some(total) if total <= self.max => {
                *used = total;
                true
            }
            _ => false,
        }
    }

    /// Return `bytes` to the quota, never going below zero
    pub fn release(&self, bytes: u64) {
        let mut used = self.used.lock();
        *used = used.saturating_sub(bytes);
    }

    pub fn used(&self) -> u64 {
        *self.used.lock()
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    /// Bytes left before the quota (zero when over it in soft mode)
    pub fn available(&self) -> u64 {
        self.max.saturating_sub(self.used())
    }

    /// `used / max`
    pub fn usage_ratio(&self) -> f64 {
        self.used() as f64 / self.max as f64
    }

    pub fn is_limit_exceeded(&self) -> bool {
        self.used() > self.max
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn pressure(&self) -> MemoryPressure {
        let ratio = self.usage_ratio();
        if ratio > CRITICAL_RATIO {
            MemoryPressure::Critical
        } else if ratio > HIGH_RATIO {
            MemoryPressure::High
        } else {
            MemoryPressure::Normal
        }
    }
}
