//! Diagnostic events emitted by the orchestrator.

use crate::handle::HandleId;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// What happened to the feed's bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// Viewport came to rest on `page`.
    Settled {
        page: i64,
        logical_index: usize,
        generation: u64,
    },
    /// A handle was attached to `page`.
    Bound { page: i64, handle: HandleId },
    /// The handle attached to `page` went back to the pool.
    Released { page: i64, handle: HandleId },
    /// `page` stays unbound until the next settle.
    AcquisitionFailed { page: i64, reason: String },
    /// A handle finished construction for a page that left the window.
    StaleCompletion { page: i64, handle: HandleId },
    /// Every binding and handle was dropped.
    TornDown,
}

/// Fan-out of [`FeedEvent`]s to any number of subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<FeedEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<FeedEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver to every live subscriber, forgetting disconnected ones.
    pub fn emit(&mut self, event: FeedEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
