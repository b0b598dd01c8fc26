//! Task queue drained by the UI thread.
//!
//! Background work never touches UI state directly; it posts a task here and
//! the thread that owns the `Looper` runs it. Whichever thread calls
//! `run_pending` / `run_next` is the UI thread.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

type Task = Box<dyn FnOnce() + Send + 'static>;

pub struct Looper {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
}

/// Cloneable posting end of a `Looper`.
#[derive(Clone)]
pub struct LooperHandle {
    sender: Sender<Task>,
}

impl LooperHandle {
    /// Queue `task` for the UI thread. Returns `false` when the looper has
    /// been dropped; the task is discarded in that case.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) -> bool {
        self.sender.send(Box::new(task)).is_ok()
    }
}

impl Looper {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub fn handle(&self) -> LooperHandle {
        LooperHandle {
            sender: self.sender.clone(),
        }
    }

    /// Run every task already queued. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Block up to `timeout` for one task and run it.
    pub fn run_next(&self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                task();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}

impl Default for Looper {
    fn default() -> Self {
        Self::new()
    }
}
