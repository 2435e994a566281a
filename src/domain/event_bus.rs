//! Broadcast channel for pagination events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. The paginator
//! publishes every [`PaginationEvent`] through the bus, and all WebSocket
//! connections subscribe to receive them.

use tokio::sync::broadcast;

use super::PaginationEvent;

/// Broadcast bus for [`PaginationEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest events are dropped for lagging
/// receivers. Sending never blocks, so publishing is safe while holding
/// the paginator's state lock.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PaginationEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: PaginationEvent) -> usize {
        tracing::trace!(event = event.event_type_str(), "publishing pagination event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PaginationEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
