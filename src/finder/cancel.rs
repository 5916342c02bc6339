use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use tracing::debug;

/// A cancellation signal shared by every unit of work of one sweep.
///
/// The signal is a channel nobody ever sends on: cancelling drops its only
/// sender, which every clone of the receiver observes as a disconnect. It
/// can therefore be used both for polling and inside `select!`.
#[derive(Debug, Clone)]
pub struct Cancellation {
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl Cancellation {
    pub fn new() -> Self {
        let (trigger, signal) = bounded(0);
        Self {
            trigger: Arc::new(Mutex::new(Some(trigger))),
            signal,
        }
    }

    /// Cancels the sweep. Only the first call has any effect.
    pub fn cancel(&self) {
        let mut trigger = self.trigger.lock().unwrap_or_else(PoisonError::into_inner);
        if trigger.take().is_some() {
            debug!("sweep cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.signal.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Receiver that becomes ready once the sweep is cancelled.
    pub fn signal(&self) -> &Receiver<()> {
        &self.signal
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}
