//! Pool configuration and its builder.

use crate::thread_pool::{TaskPanic, WorkerPool};
use crate::{PoolErrorKind, Result};
use std::convert::TryFrom;
use std::fmt;
use std::sync::Arc;
use std::thread;

/// Callback invoked on the worker thread each time a task panics
pub type PanicObserver = Arc<dyn Fn(&TaskPanic) + Send + Sync + 'static>;

const DEFAULT_THREAD_NAME_PREFIX: &str = "worker-pool";

/// Settings a WorkerPool is constructed from
#[derive(Clone)]
pub struct PoolConfig {
    /// requested number of workers, clamped to at least 1
    pub num_threads: i32,
    /// workers are named `{prefix}-{id}`
    pub thread_name_prefix: String,
    /// stack size of each worker, OS default when `None`
    pub stack_size: Option<usize>,
    /// maximum number of queued (not yet running) tasks, unbounded when `None`
    pub queue_capacity: Option<usize>,
    /// pool-wide observer of task panics
    pub on_panic: Option<PanicObserver>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let num_threads = thread::available_parallelism()
            .map(|n| i32::try_from(n.get()).unwrap_or(i32::MAX))
            .unwrap_or(1);

        Self {
            num_threads,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_owned(),
            stack_size: None,
            queue_capacity: None,
            on_panic: None,
        }
    }
}

impl PoolConfig {
    /// number of workers actually spawned
    pub fn effective_threads(&self) -> usize {
        self.num_threads.max(1) as usize
    }

    /// reject settings the pool cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.stack_size == Some(0) {
            return Err(failure::err_msg("stack_size must be > 0")
                .context(PoolErrorKind::InvalidConfig)
                .into());
        }
        if self.queue_capacity == Some(0) {
            return Err(failure::err_msg("queue_capacity must be > 0")
                .context(PoolErrorKind::InvalidConfig)
                .into());
        }
        Ok(())
    }
}

impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("num_threads", &self.num_threads)
            .field("thread_name_prefix", &self.thread_name_prefix)
            .field("stack_size", &self.stack_size)
            .field("queue_capacity", &self.queue_capacity)
            .field("on_panic", &self.on_panic.is_some())
            .finish()
    }
}

/// Fluent construction of a WorkerPool
///
/// # Example:
///
/// ```
/// use worker_pool::PoolBuilder;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let panics = Arc::new(AtomicUsize::new(0));
/// let observed = Arc::clone(&panics);
/// let pool = PoolBuilder::new()
///     .num_threads(2)
///     .thread_name_prefix("collector")
///     .on_panic(move |_| {
///         observed.fetch_add(1, Ordering::SeqCst);
///     })
///     .build()
///     .unwrap();
///
/// pool.submit(|| panic!("boom"));
/// pool.wait();
/// assert_eq!(1, panics.load(Ordering::SeqCst));
/// ```
#[derive(Debug, Default)]
pub struct PoolBuilder {
    config: PoolConfig,
}

impl PoolBuilder {
    /// builder holding the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// requested worker count; 0 and negative values become 1
    pub fn num_threads(mut self, num_threads: i32) -> Self {
        self.config.num_threads = num_threads;
        self
    }

    /// prefix of the worker thread names
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// stack size of each worker thread in bytes
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// bound the queue: `submit` blocks and `try_submit` fails past `capacity`
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = Some(capacity);
        self
    }

    /// install a pool-wide panic observer
    pub fn on_panic<F>(mut self, observer: F) -> Self
    where
        F: Fn(&TaskPanic) + Send + Sync + 'static,
    {
        self.config.on_panic = Some(Arc::new(observer));
        self
    }

    /// the configuration built so far
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// validate the configuration and spawn the workers
    pub fn build(self) -> Result<WorkerPool> {
        WorkerPool::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_thread_count() {
        let config = PoolBuilder::new().num_threads(0).config().clone();
        assert_eq!(1, config.effective_threads());

        let config = PoolBuilder::new().num_threads(-7).config().clone();
        assert_eq!(1, config.effective_threads());

        let config = PoolBuilder::new().num_threads(3).config().clone();
        assert_eq!(3, config.effective_threads());
    }

    #[test]
    fn default_is_valid() {
        let config = PoolConfig::default();
        assert!(config.num_threads >= 1);
        assert!(config.queue_capacity.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_capacity_and_stack() {
        let err = PoolBuilder::new()
            .queue_capacity(0)
            .config()
            .validate()
            .unwrap_err();
        assert_eq!(PoolErrorKind::InvalidConfig, err.kind());

        let err = PoolBuilder::new()
            .stack_size(0)
            .config()
            .validate()
            .unwrap_err();
        assert_eq!(PoolErrorKind::InvalidConfig, err.kind());
    }
}
