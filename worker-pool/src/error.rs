use failure::{Backtrace, Context, Fail};
use std::fmt;
use std::io;

/// Error Type for the worker pool
#[derive(Debug)]
pub struct PoolError {
    inner: Context<PoolErrorKind>,
}

/// Kinds of possible Errors raised by the worker pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Fail)]
pub enum PoolErrorKind {
    /// The OS refused to spawn a worker thread
    #[fail(display = "Cannot spawn worker thread")]
    ThreadSpawn,
    /// A task panicked while a caller was waiting on its result
    #[fail(display = "Task panicked")]
    TaskPanicked,
    /// A bounded queue is full and the submission would block
    #[fail(display = "Task queue is full")]
    QueueFull,
    /// The task was dropped without ever running
    #[fail(display = "Worker pool shut down before the task ran")]
    ShutDown,
    /// `try_join` was called again after the task's value was taken
    #[fail(display = "Task result was already taken")]
    ResultTaken,
    /// Rejected pool configuration
    #[fail(display = "Invalid pool configuration")]
    InvalidConfig,
}

impl PoolError {
    /// get the kind of the error
    pub fn kind(&self) -> PoolErrorKind {
        *self.inner.get_context()
    }
}

impl Fail for PoolError {
    fn cause(&self) -> Option<&dyn Fail> {
        self.inner.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.inner.backtrace()
    }
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)?;
        if let Some(cause) = self.inner.cause() {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl From<PoolErrorKind> for PoolError {
    fn from(kind: PoolErrorKind) -> PoolError {
        PoolError {
            inner: Context::new(kind),
        }
    }
}

impl From<Context<PoolErrorKind>> for PoolError {
    fn from(context: Context<PoolErrorKind>) -> PoolError {
        PoolError { inner: context }
    }
}

// std::thread::Builder::spawn is the only io source in this crate
impl From<io::Error> for PoolError {
    fn from(error: io::Error) -> PoolError {
        error.context(PoolErrorKind::ThreadSpawn).into()
    }
}
