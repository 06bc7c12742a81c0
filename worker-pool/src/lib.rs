#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

//! This crate provides a fixed-size WorkerPool that runs
//! submitted tasks on long-lived threads fed by one shared FIFO queue,
//! and lets callers block until every submitted task has finished.

mod config;
mod error;
pub mod thread_pool;

#[macro_use]
extern crate failure;
pub use config::{PanicObserver, PoolBuilder, PoolConfig};
pub use error::PoolError;
pub use error::PoolErrorKind;
pub use thread_pool::{PoolStats, TaskHandle, TaskPanic, ThreadPool, WorkerPool};

/// Result type used by this crate
pub type Result<T> = core::result::Result<T, PoolError>;
