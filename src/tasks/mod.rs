//! Tasks Module
//!
//! Fixed-interval background work on dedicated threads.
//!
//! ## Architecture
//! ```text
//!   Scheduler
//!   ├── worker "expiry-collector"   tick ─► execute ─► log error, keep going
//!   ├── worker "free-block-merger"  tick ─► execute ─► ...
//!   └── ...
//!        ▲                              │
//!        └── stop channel (dropped) ────┘ done channel ─► shutdown waits
//!                                                       up to the grace period
//! ```
//!
//! A failing or panicking cycle is logged and the task keeps its schedule.

mod maintenance;

pub use maintenance::{
    maintenance_scheduler, CacheSweeper, DefragmentationReporter, ExpiryCollector,
    FreeBlockMerger, MemoryLogger, MemoryMonitor,
};

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::Result;

/// Per-run information handed to a task
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub task_name: &'static str,

    /// 1 for the first run
    pub run_id: u64,
}

/// A task that runs periodically
pub trait BackgroundTask: Send + Sync {
    /// Task name for logging
    fn name(&self) -> &'static str;

    /// How often to run this task; zero disables it
    fn interval(&self) -> Duration;

    /// Execute one cycle
    fn execute(&self, ctx: &TaskContext) -> Result<()>;
}

struct Worker {
    id: u64,
    name: &'static str,
    stop_tx: Option<Sender<()>>,
    handle: JoinHandle<()>,
}

/// Owns the task threads and stops them on shutdown or drop
pub struct Scheduler {
    workers: Vec<Worker>,
    next_id: u64,
    done_tx: Sender<u64>,
    done_rx: Receiver<u64>,
    grace: Duration,
}

impl Scheduler {
    /// Create a scheduler whose shutdown waits at most `grace`
    pub fn new(grace: Duration) -> Self {
        let (done_tx, done_rx) = channel::unbounded();
        Self {
            workers: Vec::new(),
            next_id: 0,
            done_tx,
            done_rx,
            grace,
        }
    }

    /// Start a periodic task; a zero interval skips registration
    pub fn register<T: BackgroundTask + 'static>(&mut self, task: Arc<T>) -> Result<&mut Self> {
        let name = task.name();
        let interval = task.interval();
        if interval.is_zero() {
            tracing::debug!(task = name, "Task disabled (zero interval)");
            return Ok(self);
        }

        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let done_tx = self.done_tx.clone();
        let id = self.next_id;

        let handle = thread::Builder::new()
            .name(format!("slabkv-{}", name))
            .spawn(move || {
                run_timer_loop(task.as_ref(), interval, stop_rx);
                let _ = done_tx.send(id);
            })?;

        self.next_id += 1;
        self.workers.push(Worker {
            id,
            name,
            stop_tx: Some(stop_tx),
            handle,
        });
        Ok(self)
    }

    /// Number of running tasks
    pub fn task_count(&self) -> usize {
        self.workers.len()
    }

    /// Names of the running tasks
    pub fn task_names(&self) -> Vec<&'static str> {
        self.workers.iter().map(|w| w.name).collect()
    }

    /// Stop the first task registered as `name`, waiting up to the grace
    /// period; the other tasks keep running.
    ///
    /// Returns `false` if no such task runs, or if it did not stop in time
    /// (its thread is then detached).
    pub fn stop(&mut self, name: &str) -> bool {
        let position = match self.workers.iter().position(|w| w.name == name) {
            Some(position) => position,
            None => return false,
        };
        let mut worker = self.workers.remove(position);
        worker.stop_tx.take();

        let mut signalled = false;
        if worker.handle.thread().id() != thread::current().id() {
            let deadline = Instant::now() + self.grace;
            while let Ok(id) = self.done_rx.recv_deadline(deadline) {
                if id == worker.id {
                    signalled = true;
                    break;
                }
            }
        }
        self.finish(worker, signalled)
    }

    /// Stop every task, waiting up to the grace period.
    ///
    /// Returns the number of tasks still running when the grace period ran
    /// out; their threads are detached.
    pub fn shutdown(&mut self) -> usize {
        if self.workers.is_empty() {
            return 0;
        }

        // Dropping the sender disconnects the stop channel
        for worker in &mut self.workers {
            worker.stop_tx.take();
        }

        // A task dropping the last engine handle ends up here on its own thread
        let current = thread::current().id();
        let mut waiting: HashSet<u64> = self
            .workers
            .iter()
            .filter(|w| w.handle.thread().id() != current)
            .map(|w| w.id)
            .collect();

        // Ids of tasks detached by an earlier `stop` may still arrive
        let deadline = Instant::now() + self.grace;
        while !waiting.is_empty() {
            match self.done_rx.recv_deadline(deadline) {
                Ok(id) => {
                    waiting.remove(&id);
                }
                Err(_) => break,
            }
        }

        let mut stuck = 0;
        let workers: Vec<Worker> = self.workers.drain(..).collect();
        for worker in workers {
            if worker.handle.thread().id() == current {
                continue;
            }
            let signalled = !waiting.contains(&worker.id);
            if !self.finish(worker, signalled) {
                stuck += 1;
            }
        }
        stuck
    }

    /// Join a worker that reported done or has exited, otherwise detach it
    fn finish(&self, worker: Worker, signalled: bool) -> bool {
        if signalled || worker.handle.is_finished() {
            let _ = worker.handle.join();
            tracing::debug!(task = worker.name, "Task stopped");
            true
        } else {
            tracing::warn!(
                task = worker.name,
                "Task did not stop within {:?}; detaching",
                self.grace
            );
            false
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_timer_loop(task: &dyn BackgroundTask, interval: Duration, stop_rx: Receiver<()>) {
    let ticker = channel::tick(interval);
    let mut run_id = 0u64;

    loop {
        crossbeam::select! {
            recv(ticker) -> _ => {
                run_id += 1;
                let ctx = TaskContext {
                    task_name: task.name(),
                    run_id,
                };

                match panic::catch_unwind(AssertUnwindSafe(|| task.execute(&ctx))) {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::error!(task = task.name(), run_id, error = %e, "Task execution failed");
                    }
                    Err(_) => {
                        tracing::error!(task = task.name(), run_id, "Task panicked");
                    }
                }
            }
            recv(stop_rx) -> _ => {
                tracing::info!(task = task.name(), "Task shutting down");
                break;
            }
        }
    }
}
