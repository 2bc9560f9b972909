//! Event system for the agent console
//!
//! Two broadcast channels live here:
//!
//! - [`EventEmitter`] publishes [`NotificationEvent`]s whenever a transfer
//!   notification arrives or leaves the pending set. Subscribers get the
//!   [`Resolution`] explicitly, so an audit trail can be built on top without
//!   the store having to remember anything.
//! - [`PanelSignalBus`] carries [`PanelSignal`]s between console widgets,
//!   e.g. the "shake" poke the outbound-call button sends to an already open
//!   call panel.

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::trace;

use crate::notification::{Resolution, TransferNotification};
use crate::presence::PresenceStatus;

/// Events emitted by the notification lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// A new notification entered the pending set
    Arrived(TransferNotification),

    /// A notification left the pending set
    Resolved {
        /// The removed notification
        notification: TransferNotification,
        /// Why it was removed
        resolution: Resolution,
    },

    /// A request arrived while the agent was not accepting transfers
    Suppressed {
        /// Presence at the time the request was dropped
        presence: PresenceStatus,
    },
}

/// Event stream type
pub type EventStream = BroadcastStream<NotificationEvent>;

/// Simple event iterator that doesn't require StreamExt
pub struct EventIterator {
    stream: EventStream,
}

impl EventIterator {
    pub fn new(stream: EventStream) -> Self {
        Self { stream }
    }

    /// Get the next event, skipping over lag notices
    pub async fn next(&mut self) -> Option<NotificationEvent> {
        use tokio_stream::StreamExt;
        loop {
            match self.stream.next().await {
                Some(Ok(event)) => return Some(event),
                Some(Err(_lagged)) => continue,
                None => return None,
            }
        }
    }
}

/// Event emitter for notification lifecycle events
#[derive(Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<NotificationEvent>,
}

impl EventEmitter {
    /// Create a new event emitter with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Emit an event; having no subscribers is fine
    pub fn emit(&self, event: NotificationEvent) {
        if self.sender.send(event).is_err() {
            trace!("No subscribers for notification event");
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.sender.subscribe()
    }

    /// Subscribe as an iterator
    pub fn iter(&self) -> EventIterator {
        EventIterator::new(BroadcastStream::new(self.sender.subscribe()))
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EVENT_CAPACITY)
    }
}

/// Signals exchanged between console widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSignal {
    /// Draw attention to an already open call panel
    Shake,
}

/// Typed broadcast channel for [`PanelSignal`]s
#[derive(Clone)]
pub struct PanelSignalBus {
    sender: broadcast::Sender<PanelSignal>,
}

impl PanelSignalBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a signal; returns how many listeners received it
    pub fn publish(&self, signal: PanelSignal) -> usize {
        self.sender.send(signal).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelSignal> {
        self.sender.subscribe()
    }
}

impl Default for PanelSignalBus {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::TransferRequest;

    #[tokio::test]
    async fn test_emit_without_subscribers_is_harmless() {
        let emitter = EventEmitter::new(4);
        emitter.emit(NotificationEvent::Suppressed {
            presence: PresenceStatus::Offline,
        });
        assert_eq!(emitter.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_iterator_receives_events() {
        let emitter = EventEmitter::new(4);
        let mut events = emitter.iter();

        let n = TransferNotification::from_request(TransferRequest::new("a", "b", "c"));
        emitter.emit(NotificationEvent::Arrived(n.clone()));

        assert_eq!(events.next().await, Some(NotificationEvent::Arrived(n)));
    }

    #[tokio::test]
    async fn test_panel_signal_bus() {
        let bus = PanelSignalBus::default();
        assert_eq!(bus.publish(PanelSignal::Shake), 0);

        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(PanelSignal::Shake), 1);
        assert_eq!(rx.recv().await.unwrap(), PanelSignal::Shake);
    }
}
