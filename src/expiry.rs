//! A single-shot timer that can be re-armed.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// How long a freshly generated character password stays valid.
pub const PASSWORD_LIFETIME: Duration = Duration::from_secs(30);

/// Runs a callback once after a delay, unless cancelled first.
///
/// At most one callback is pending: arming cancels whatever was armed before. Dropping the timer
/// cancels the pending callback.
#[derive(Default)]
pub struct ExpiryTimer {
    /// Dropping the sender wakes the waiting thread with `Disconnected`, which it treats as a
    /// cancellation.
    cancel: Option<mpsc::Sender<()>>,
}

impl ExpiryTimer {
    pub fn new() -> ExpiryTimer {
        ExpiryTimer::default()
    }

    /// Cancel any pending callback, then schedule `on_expiry` to run after `after`.
    pub fn arm<F>(&mut self, after: Duration, on_expiry: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let (tx, rx) = mpsc::channel::<()>();
        thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = rx.recv_timeout(after) {
                on_expiry();
            }
        });
        self.cancel = Some(tx);
    }

    /// Cancel the pending callback, if any. Returns whether one was pending.
    ///
    /// A callback whose delay has already elapsed may still be running; callers that need to
    /// ignore a late callback must check for staleness themselves.
    pub fn cancel(&mut self) -> bool {
        self.cancel.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.cancel.is_some()
    }
}
