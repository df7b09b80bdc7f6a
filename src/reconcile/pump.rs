//! Event pump: feeds a channel of change events into a reconciler, in order.

use crate::events::ChangeEvent;
use crate::reconcile::Reconciler;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Receiving end of the change-event channel.
///
/// Events are applied on the thread that calls into the pump, one at a time and
/// in the order they were sent.
pub struct EventPump {
    rx: Receiver<ChangeEvent>,
}

impl EventPump {
    /// Create a channel and the pump reading from it.
    pub fn channel() -> (Sender<ChangeEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    pub fn new(rx: Receiver<ChangeEvent>) -> Self {
        Self { rx }
    }

    /// Apply every event already queued. Returns how many were applied.
    pub fn drain(&self, reconciler: &mut Reconciler) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            reconciler.dispatch(&event);
            applied += 1;
        }
        applied
    }

    /// Wait up to `timeout` for one event and apply it.
    ///
    /// Returns `Ok(true)` if an event was applied, `Ok(false)` on timeout and
    /// `Err(RecvTimeoutError::Disconnected)` once every sender is gone.
    pub fn pump_once(
        &self,
        reconciler: &mut Reconciler,
        timeout: Duration,
    ) -> Result<bool, RecvTimeoutError> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                reconciler.dispatch(&event);
                Ok(true)
            }
            Err(RecvTimeoutError::Timeout) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Apply events until every sender has been dropped.
    pub fn run(&self, reconciler: &mut Reconciler) -> usize {
        let mut applied = 0;
        for event in self.rx.iter() {
            reconciler.dispatch(&event);
            applied += 1;
        }
        applied
    }
}
