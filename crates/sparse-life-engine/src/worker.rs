//! Autonomous stepping loop for [`ThreadedController`](crate::ThreadedController).
//!
//! The worker shares the controller through a mutex and holds the lock
//! only while stepping or computing its next deadline. Between steps it
//! blocks on the wake channel: with a timeout while running, without one
//! otherwise. Dropping the sender disconnects the channel, which ends
//! the loop at its next wait.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::debug;

use crate::controller::Controller;

/// Lock the shared controller, recovering from poisoning.
///
/// A panic inside a user callback poisons the mutex but cannot leave
/// the controller half-stepped: the engine commits before callbacks run.
pub(crate) fn lock(shared: &Mutex<Controller>) -> MutexGuard<'_, Controller> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State held by the worker thread's main loop.
pub(crate) struct StepWorker {
    shared: Arc<Mutex<Controller>>,
    wake_rx: Receiver<()>,
}

impl StepWorker {
    pub fn new(shared: Arc<Mutex<Controller>>, wake_rx: Receiver<()>) -> Self {
        Self { shared, wake_rx }
    }

    /// Main loop. Runs until the wake channel disconnects.
    pub fn run(self) {
        debug!("step worker started");
        let mut steps = 0u64;
        loop {
            // 1. Step if due, and find out how long to wait.
            let wait = {
                let mut controller = lock(&self.shared);
                if controller.update_at(Instant::now()).is_some() {
                    steps += 1;
                }
                controller.time_until_next_step(Instant::now())
            };

            // 2. Sleep until due, woken early by any command.
            let disconnected = match wait {
                Some(timeout) => matches!(
                    self.wake_rx.recv_timeout(timeout),
                    Err(RecvTimeoutError::Disconnected)
                ),
                None => self.wake_rx.recv().is_err(),
            };
            if disconnected {
                break;
            }
        }
        debug!(steps, "step worker exited");
    }
}
