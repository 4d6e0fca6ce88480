//! Engine maintenance tasks
//!
//! | Task                    | Default interval | Effect                                 |
//! |-------------------------|------------------|----------------------------------------|
//! | expiry-collector        | 1 h              | drop expired tombstones from the index |
//! | free-block-merger       | 30 min           | coalesce adjacent free blocks          |
//! | defragmentation-report  | 6 h              | log fragmentation figures              |
//! | memory-logger           | 5 min            | warn above 80 % memory                 |
//! | memory-monitor          | 1 min            | sweep cache above 90 %, warn above 95 % |
//! | cache-sweeper           | 1 h              | evict stale cache entries              |
//!
//! Tasks hold a `Weak<Engine>`; once the engine is gone a cycle is a no-op.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::config::MaintenanceConfig;
use crate::engine::Engine;
use crate::error::Result;
use crate::memory::{MemoryPressure, LOG_RATIO};

use super::{BackgroundTask, Scheduler, TaskContext};

/// Build a scheduler running every maintenance task for `engine`
pub fn maintenance_scheduler(engine: Weak<Engine>, config: &MaintenanceConfig) -> Result<Scheduler> {
    let mut scheduler = Scheduler::new(config.shutdown_grace);
    scheduler
        .register(Arc::new(ExpiryCollector::new(engine.clone(), config.expiry_collection_interval)))?
        .register(Arc::new(FreeBlockMerger::new(engine.clone(), config.free_block_merge_interval)))?
        .register(Arc::new(DefragmentationReporter::new(engine.clone(), config.defragmentation_interval)))?
        .register(Arc::new(MemoryLogger::new(engine.clone(), config.memory_log_interval)))?
        .register(Arc::new(MemoryMonitor::new(engine.clone(), config.memory_monitor_interval)))?
        .register(Arc::new(CacheSweeper::new(engine, config.cache_sweep_interval)))?;
    Ok(scheduler)
}

macro_rules! engine_task {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            engine: Weak<Engine>,
            interval: Duration,
        }

        impl $name {
            pub fn new(engine: Weak<Engine>, interval: Duration) -> Self {
                Self { engine, interval }
            }
        }
    };
}

engine_task!(
    /// Removes tombstoned headers whose expiry has passed
    ExpiryCollector
);
engine_task!(
    /// Coalesces adjacent free blocks
    FreeBlockMerger
);
engine_task!(
    /// Logs fragmentation; never moves data
    DefragmentationReporter
);
engine_task!(
    /// Warns when memory usage runs high
    MemoryLogger
);
engine_task!(
    /// Reclaims cache memory under pressure
    MemoryMonitor
);
engine_task!(
    /// Evicts stale cache entries
    CacheSweeper
);

impl BackgroundTask for ExpiryCollector {
    fn name(&self) -> &'static str {
        "expiry-collector"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn execute(&self, _ctx: &TaskContext) -> Result<()> {
        if let Some(engine) = self.engine.upgrade() {
            engine.collect_expired()?;
        }
        Ok(())
    }
}

impl BackgroundTask for FreeBlockMerger {
    fn name(&self) -> &'static str {
        "free-block-merger"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn execute(&self, _ctx: &TaskContext) -> Result<()> {
        if let Some(engine) = self.engine.upgrade() {
            engine.merge_free_blocks();
        }
        Ok(())
    }
}

impl BackgroundTask for DefragmentationReporter {
    fn name(&self) -> &'static str {
        "defragmentation-report"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn execute(&self, _ctx: &TaskContext) -> Result<()> {
        if let Some(engine) = self.engine.upgrade() {
            engine.defragmentation_report();
        }
        Ok(())
    }
}

impl BackgroundTask for MemoryLogger {
    fn name(&self) -> &'static str {
        "memory-logger"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn execute(&self, _ctx: &TaskContext) -> Result<()> {
        let engine = match self.engine.upgrade() {
            Some(engine) => engine,
            None => return Ok(()),
        };

        let memory = engine.memory();
        let ratio = memory.usage_ratio();
        if ratio > LOG_RATIO {
            tracing::warn!(
                "Memory warning: {:.1}% used ({}/{} bytes)",
                ratio * 100.0,
                memory.used(),
                memory.max()
            );
        }
        Ok(())
    }
}

impl BackgroundTask for MemoryMonitor {
    fn name(&self) -> &'static str {
        "memory-monitor"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn execute(&self, _ctx: &TaskContext) -> Result<()> {
        let engine = match self.engine.upgrade() {
            Some(engine) => engine,
            None => return Ok(()),
        };

        match engine.memory().pressure() {
            MemoryPressure::Normal => {}
            MemoryPressure::High => {
                let evicted = engine.sweep_cache();
                tracing::info!("High memory usage, swept {} cache entries", evicted);
            }
            MemoryPressure::Critical => {
                let evicted = engine.sweep_cache();
                tracing::warn!(
                    "Critical memory usage: {:.1}% ({} cache entries swept)",
                    engine.memory().usage_ratio() * 100.0,
                    evicted
                );
            }
        }
        Ok(())
    }
}

impl BackgroundTask for CacheSweeper {
    fn name(&self) -> &'static str {
        "cache-sweeper"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn execute(&self, _ctx: &TaskContext) -> Result<()> {
        if let Some(engine) = self.engine.upgrade() {
            let evicted = engine.sweep_cache();
            if evicted > 0 {
                tracing::debug!("Cache sweep evicted {} entries", evicted);
            }
        }
        Ok(())
    }
}
