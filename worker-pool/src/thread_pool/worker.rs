use super::shared_queue::SharedQueue;
use super::task::{discard, TaskPanic};
use crate::{PanicObserver, PoolConfig, Result};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, trace, warn};

pub(crate) struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub(crate) fn spawn(id: usize, queue: Arc<SharedQueue>, config: &PoolConfig) -> Result<Self> {
        let mut builder =
            thread::Builder::new().name(format!("{}-{}", config.thread_name_prefix, id));
        if let Some(size) = config.stack_size {
            builder = builder.stack_size(size);
        }

        let observer = config.on_panic.clone();
        let handle = builder.spawn(move || run(id, &queue, observer.as_ref()))?;

        Ok(Self {
            id,
            handle: Some(handle),
        })
    }

    pub(crate) fn join(&mut self) {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => return,
        };

        // the pool was dropped from one of its own tasks; joining would never return
        if handle.thread().id() == thread::current().id() {
            warn!("Worker {} dropped its own pool, detaching", self.id);
            return;
        }

        trace!("Joining Worker {}", self.id);
        if let Err(payload) = handle.join() {
            error!("Worker {} terminated abnormally", self.id);
            discard(payload);
        }
    }
}

fn run(id: usize, queue: &SharedQueue, observer: Option<&PanicObserver>) {
    trace!("Worker {} started", id);

    while let Some(task) = queue.pop() {
        trace!("Worker {} running task", id);
        let result = task.run_boxed();
        let panicked = result.is_err();

        if let Err(message) = result {
            let fault = TaskPanic {
                worker: id,
                message,
            };
            error!("Worker: {}, Error: {}", id, fault);
            if let Some(observer) = observer {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(|| observer(&fault))) {
                    error!("Worker: {}, panic observer panicked", id);
                    discard(payload);
                }
            }
        }

        queue.finish(panicked);
    }

    trace!("Worker {} exiting", id);
}
