use std::any::Any;
use std::mem;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// One-shot callable stored in the queue. Boxed `FnOnce` cannot be
/// called through a trait object directly, hence the `self: Box<Self>` receiver.
pub(crate) trait Run {
    /// run the body, turning a panic into its message
    fn run_boxed(self: Box<Self>) -> Result<(), String>;
}

impl<F: FnOnce()> Run for F {
    fn run_boxed(self: Box<Self>) -> Result<(), String> {
        catch_unwind(AssertUnwindSafe(*self)).map_err(|payload| {
            let message = panic_message(&*payload);
            discard(payload);
            message
        })
    }
}

pub(crate) type Task = Box<dyn Run + Send + 'static>;

/// A panic raised by a task body, as reported to the pool's panic observer
#[derive(Debug, Clone, PartialEq, Eq, Fail)]
#[fail(display = "worker {} task panicked: {}", worker, message)]
pub struct TaskPanic {
    /// id of the worker that ran the task
    pub worker: usize,
    /// panic payload rendered as text
    pub message: String,
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_owned()
    }
}

/// Drop a panic payload without letting a panicking `Drop` unwind further.
pub(crate) fn discard(payload: Box<dyn Any + Send>) {
    if let Err(nested) = catch_unwind(AssertUnwindSafe(move || drop(payload))) {
        mem::forget(nested);
    }
}
