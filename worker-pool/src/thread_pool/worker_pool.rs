use super::handle::TaskHandle;
use super::shared_queue::{PoolStats, SharedQueue};
use super::task::panic_message;
use super::worker::Worker;
use super::ThreadPool;
use crate::{PoolConfig, PoolErrorKind, Result};
use crossbeam::channel;
use std::fmt;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::debug;

/// Fixed-size pool of workers fed by one shared FIFO queue.
///
/// Workers are spawned once in the constructor and live until the pool is
/// dropped. A task that panics is logged, counted and reported to the
/// configured panic observer; its worker keeps serving the queue.
///
/// # Note:
/// Dropping a WorkerPool runs every task still queued and joins all workers,
/// so a task that never returns makes the drop block forever.
///
/// # Example:
///
/// ```
/// use worker_pool::{ThreadPool, WorkerPool};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let pool = WorkerPool::new(4).unwrap();
/// let counter = Arc::new(AtomicUsize::new(0));
///
/// for _ in 0..8 {
///     let counter = Arc::clone(&counter);
///     pool.spawn(move || {
///         counter.fetch_add(1, Ordering::SeqCst);
///     });
/// }
///
/// pool.wait();
/// assert_eq!(8, counter.load(Ordering::SeqCst));
/// ```
pub struct WorkerPool {
    workers: Vec<Worker>,
    queue: Arc<SharedQueue>,
}

impl WorkerPool {
    /// spawn the workers described by `config`
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let num_threads = config.effective_threads();
        let queue = Arc::new(SharedQueue::new(config.queue_capacity));
        let mut workers = Vec::with_capacity(num_threads);

        for id in 0..num_threads {
            match Worker::spawn(id, Arc::clone(&queue), &config) {
                Ok(worker) => workers.push(worker),
                Err(error) => {
                    // shut down and join whatever already started
                    drop(Self { workers, queue });
                    return Err(error);
                }
            }
        }

        debug!(
            "WorkerPool started: {} workers, queue capacity {:?}",
            num_threads, config.queue_capacity
        );
        Ok(Self { workers, queue })
    }

    /// number of workers serving this pool
    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }

    /// Queue a task.
    ///
    /// Never blocks on an unbounded pool. On a bounded pool it blocks while
    /// the queue is full.
    pub fn submit<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.push(Box::new(f));
    }

    /// queue a task without blocking, failing with `QueueFull` on a full bounded queue
    pub fn try_submit<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue
            .try_push(Box::new(f))
            .map_err(|_task| PoolErrorKind::QueueFull.into())
    }

    /// queue a task whose return value (or panic) is delivered through a handle
    pub fn spawn_with_handle<F, T>(&self, f: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = channel::bounded(1);
        self.submit(move || match catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => {
                let _ = sender.send(Ok(value));
            }
            Err(payload) => {
                let _ = sender.send(Err(panic_message(&*payload)));
                // let the worker account for the panic as well
                resume_unwind(payload);
            }
        });
        TaskHandle::new(receiver)
    }

    /// Block until nothing is queued and nothing is running.
    ///
    /// This observes one quiescent instant. Tasks submitted concurrently from
    /// other threads may extend the wait or run after it returns.
    pub fn wait(&self) {
        self.queue.wait_idle();
    }

    /// snapshot of queue length and task counters
    pub fn stats(&self) -> PoolStats {
        self.queue.stats(self.workers.len())
    }

    /// drain the queue and join every worker
    pub fn shutdown(self) {
        drop(self);
    }
}

impl ThreadPool for WorkerPool {
    fn new(capacity: i32) -> Result<Self> {
        Self::with_config(PoolConfig {
            num_threads: capacity,
            ..PoolConfig::default()
        })
    }

    fn spawn<F: FnOnce() + Send + 'static>(&self, f: F) {
        self.submit(f);
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("stats", &self.stats())
            .finish()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        debug!("WorkerPool shutting down");
        self.queue.shutdown();

        for worker in &mut self.workers {
            worker.join();
        }
    }
}
