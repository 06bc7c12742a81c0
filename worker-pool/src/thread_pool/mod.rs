//! This module contains the ThreadPool trait
//! and the WorkerPool implementing it.

use crate::Result;

/// ThreadPool trait that describes
/// the functionality of a thread pool capable of
/// running tasks on a fixed set of threads
pub trait ThreadPool: Sized {
    /// create a new instance with `capacity` workers, at least one
    fn new(capacity: i32) -> Result<Self>;

    /// queue a task to run on one of the workers
    fn spawn<F: FnOnce() + Send + 'static>(&self, f: F);
}

mod handle;
mod shared_queue;
mod task;
mod worker;
mod worker_pool;

pub use handle::TaskHandle;
pub use shared_queue::PoolStats;
pub use task::TaskPanic;
pub use worker_pool::WorkerPool;
