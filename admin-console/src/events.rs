//! Console events
//!
//! Notifications for whoever renders the console: the refresh signal after
//! a successful save, and passive notices for failed loads.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// The draft was written; the caller should fetch the authoritative
    /// config again and re-seed
    ConfigCommitted,
    /// Save failed with a human-readable reason
    CommitFailed { message: String },
    /// The draft was replaced by an authoritative value
    ConfigSeeded { discarded_edits: bool },
    OrdersLoaded { count: usize },
    OrdersLoadFailed { message: String },
}

/// Broadcast channel for [`ConsoleEvent`]s, silenced once the session shuts down
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ConsoleEvent>,
    shutdown: CancellationToken,
}

impl EventBus {
    pub fn new(shutdown: CancellationToken) -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender, shutdown }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: ConsoleEvent) {
        if self.shutdown.is_cancelled() {
            tracing::trace!(?event, "Event dropped after shutdown");
            return;
        }
        // No subscribers is fine
        let _ = self.sender.send(event);
    }
}
