use crate::{PoolErrorKind, Result};
use crossbeam::channel::{Receiver, TryRecvError};

pub(crate) type Outcome<T> = std::result::Result<T, String>;

/// Result slot of a task submitted through `WorkerPool::spawn_with_handle`
///
/// Dropping the handle does not cancel the task; its value is discarded.
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: Receiver<Outcome<T>>,
    taken: bool,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(receiver: Receiver<Outcome<T>>) -> Self {
        Self {
            receiver,
            taken: false,
        }
    }

    /// block until the task returned and take its value
    ///
    /// Fails with `TaskPanicked` if the body panicked, and with `ShutDown`
    /// if the task was dropped without running.
    pub fn join(self) -> Result<T> {
        match self.receiver.recv() {
            Ok(outcome) => into_result(outcome),
            Err(_) => Err(PoolErrorKind::ShutDown.into()),
        }
    }

    /// the task's value if it already returned, `None` while it is pending
    ///
    /// Once the value has been taken, later calls report `ResultTaken`.
    pub fn try_join(&mut self) -> Option<Result<T>> {
        if self.taken {
            return Some(Err(PoolErrorKind::ResultTaken.into()));
        }
        match self.receiver.try_recv() {
            Ok(outcome) => {
                self.taken = true;
                Some(into_result(outcome))
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(PoolErrorKind::ShutDown.into())),
        }
    }
}

fn into_result<T>(outcome: Outcome<T>) -> Result<T> {
    outcome.map_err(|message| {
        failure::err_msg(message)
            .context(PoolErrorKind::TaskPanicked)
            .into()
    })
}
