use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::runtime::SessionEvent;

/// Background timer that posts a single [`SessionEvent::Timeout`] once
/// `deadline` passes.
///
/// The monitor never touches session state; the event loop decides what the
/// timeout means. Dropping the monitor cancels the wait and joins the thread.
#[derive(Debug)]
pub struct TimeoutMonitor {
    deadline: Instant,
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TimeoutMonitor {
    pub fn spawn(deadline: Instant, events: Sender<SessionEvent>) -> Self {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let wait = deadline.saturating_duration_since(Instant::now());
            match cancel_rx.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => {
                    let fired_at = Instant::now();
                    log::debug!("session timeout fired");
                    if events.send(SessionEvent::Timeout(fired_at)).is_err() {
                        log::debug!("event loop gone before timeout was delivered");
                    }
                }
                // explicit cancel or the monitor was dropped
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("session timeout cancelled");
                }
            }
        });

        Self {
            deadline,
            cancel: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            // the thread may already have fired and exited
            let _ = cancel.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("timeout monitor thread panicked");
            }
        }
    }
}

impl Drop for TimeoutMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
