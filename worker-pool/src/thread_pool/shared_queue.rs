use super::task::Task;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Point-in-time view of a WorkerPool, taken under its lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// number of workers
    pub threads: usize,
    /// tasks waiting in the queue
    pub queued: usize,
    /// tasks currently executing
    pub active: usize,
    /// tasks that returned, panicked ones included
    pub completed: u64,
    /// tasks whose body panicked
    pub panicked: u64,
}

struct State {
    tasks: VecDeque<Task>,
    shutdown: bool,
    active: usize,
    completed: u64,
    panicked: u64,
}

impl State {
    fn is_quiescent(&self) -> bool {
        self.tasks.is_empty() && self.active == 0
    }
}

/// State shared by the pool handle and every worker.
///
/// One mutex guards the queue, the shutdown flag and the counters.
/// It is never held while a task body runs.
pub(crate) struct SharedQueue {
    state: Mutex<State>,
    // new task or shutdown
    work: Condvar,
    // queue empty and nothing running
    idle: Condvar,
    // a slot freed up in a bounded queue
    space: Condvar,
    capacity: Option<usize>,
}

impl SharedQueue {
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        Self {
            state: Mutex::new(State {
                tasks: VecDeque::new(),
                shutdown: false,
                active: 0,
                completed: 0,
                panicked: 0,
            }),
            work: Condvar::new(),
            idle: Condvar::new(),
            space: Condvar::new(),
            capacity,
        }
    }

    // task bodies never run under the lock, so a poisoned state is still consistent
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_full(&self, state: &State) -> bool {
        match self.capacity {
            Some(capacity) => state.tasks.len() >= capacity,
            None => false,
        }
    }

    /// append at the tail, blocking while a bounded queue is full
    pub(crate) fn push(&self, task: Task) {
        let mut state = self.lock();
        if self.capacity.is_some() {
            state = self
                .space
                .wait_while(state, |s| self.is_full(s))
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.tasks.push_back(task);
        drop(state);
        self.work.notify_one();
    }

    /// append at the tail, handing the task back if the queue is full
    pub(crate) fn try_push(&self, task: Task) -> Result<(), Task> {
        let mut state = self.lock();
        if self.is_full(&state) {
            return Err(task);
        }
        state.tasks.push_back(task);
        drop(state);
        self.work.notify_one();
        Ok(())
    }

    /// Block until there is work or the pool shuts down.
    ///
    /// Returns `None` only once shutdown is requested and the queue is drained.
    /// A returned task is already counted as active.
    pub(crate) fn pop(&self) -> Option<Task> {
        let state = self.lock();
        let mut state = self
            .work
            .wait_while(state, |s| !s.shutdown && s.tasks.is_empty())
            .unwrap_or_else(PoisonError::into_inner);

        let task = state.tasks.pop_front()?;
        state.active += 1;
        drop(state);

        if self.capacity.is_some() {
            self.space.notify_one();
        }
        Some(task)
    }

    /// bookkeeping after a popped task returned
    pub(crate) fn finish(&self, panicked: bool) {
        let mut state = self.lock();
        state.active -= 1;
        state.completed += 1;
        if panicked {
            state.panicked += 1;
        }
        let quiescent = state.is_quiescent();
        drop(state);

        if quiescent {
            self.idle.notify_all();
        }
    }

    /// block until an instant with nothing queued and nothing running
    pub(crate) fn wait_idle(&self) {
        let state = self.lock();
        let _state = self
            .idle
            .wait_while(state, |s| !s.is_quiescent())
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// set the shutdown flag and wake every worker
    pub(crate) fn shutdown(&self) {
        self.lock().shutdown = true;
        self.work.notify_all();
    }

    pub(crate) fn stats(&self, threads: usize) -> PoolStats {
        let state = self.lock();
        PoolStats {
            threads,
            queued: state.tasks.len(),
            active: state.active,
            completed: state.completed,
            panicked: state.panicked,
        }
    }
}
