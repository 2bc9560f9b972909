//! # Notification Presenter
//!
//! Exposes the pending transfer notifications to the agent and resolves them.
//!
//! The presenter owns the notification store. The scheduler only receives a
//! clone of the [`SharedStore`] handle from whoever built the presenter, so
//! every mutation still flows through the same mutex.
//!
//! ## Display contract
//!
//! - empty pending set: no panel ([`NotificationPresenter::view`] returns `None`)
//! - collapsed: only the most recently added notification
//! - expanded: every pending notification, newest last
//!
//! Accept, reject and dismiss all remove entries immediately. Removing an id
//! that is no longer pending (for example because its countdown just ran
//! out) is a silent no-op.

use serde::Serialize;
use tracing::{debug, info};

use crate::events::{EventEmitter, NotificationEvent};
use crate::notification::{
    NotificationId, NotificationStore, Resolution, SharedStore, TransferNotification,
};

/// One notification as rendered in the panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationCard {
    pub notification: TransferNotification,
    /// Seconds left before auto-reject
    pub remaining_secs: u32,
}

/// What the floating notification panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PanelView {
    /// Only the newest notification
    Collapsed {
        latest: NotificationCard,
        /// How many older notifications are hidden
        hidden: usize,
    },
    /// Every pending notification, newest last
    Expanded { cards: Vec<NotificationCard> },
}

impl PanelView {
    /// Cards visible in this view
    pub fn cards(&self) -> Vec<&NotificationCard> {
        match self {
            PanelView::Collapsed { latest, .. } => vec![latest],
            PanelView::Expanded { cards } => cards.iter().collect(),
        }
    }
}

/// Presents pending transfer notifications and resolves them
pub struct NotificationPresenter {
    store: SharedStore,
    events: EventEmitter,
    expanded: bool,
}

impl NotificationPresenter {
    /// Create a presenter with its own empty store
    pub fn new(initial_countdown: u32, events: EventEmitter) -> Self {
        Self {
            store: NotificationStore::shared(initial_countdown),
            events,
            expanded: false,
        }
    }

    /// Handle to the store for the scheduler tasks
    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    /// Accept a transfer
    pub fn accept(&self, id: &NotificationId) -> Option<TransferNotification> {
        self.resolve(id, Resolution::Accepted)
    }

    /// Reject a transfer
    pub fn reject(&self, id: &NotificationId) -> Option<TransferNotification> {
        self.resolve(id, Resolution::Rejected)
    }

    /// Clear every pending notification at once
    pub fn dismiss_all(&self) -> usize {
        let cleared = self.store.lock().clear();
        let count = cleared.len();
        for notification in cleared {
            self.events.emit(NotificationEvent::Resolved {
                notification,
                resolution: Resolution::Dismissed,
            });
        }
        if count > 0 {
            info!("🧹 Dismissed {} pending transfer notifications", count);
        }
        count
    }

    fn resolve(&self, id: &NotificationId, resolution: Resolution) -> Option<TransferNotification> {
        let removed = self.store.lock().remove(id);
        match &removed {
            Some(notification) => {
                info!(
                    "✅ Transfer of {} from {} {}",
                    notification.customer_name, notification.from_agent, resolution
                );
                self.events.emit(NotificationEvent::Resolved {
                    notification: notification.clone(),
                    resolution,
                });
            }
            None => debug!("Notification {} no longer pending; {} ignored", id, resolution),
        }
        removed
    }

    pub fn toggle_expanded(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Current panel contents, `None` when nothing is pending
    pub fn view(&self) -> Option<PanelView> {
        let store = self.store.lock();
        let card = |n: &TransferNotification| NotificationCard {
            notification: n.clone(),
            remaining_secs: store.remaining(&n.id).unwrap_or(0),
        };

        if self.expanded {
            let cards: Vec<_> = store.pending().iter().map(card).collect();
            if cards.is_empty() {
                return None;
            }
            Some(PanelView::Expanded { cards })
        } else {
            let latest = store.latest().map(card)?;
            Some(PanelView::Collapsed {
                latest,
                hidden: store.len() - 1,
            })
        }
    }

    pub fn pending_count(&self) -> usize {
        self.store.lock().len()
    }

    /// Pending notification and countdown entry counts, read under one lock
    pub fn counts(&self) -> (usize, usize) {
        let store = self.store.lock();
        (store.len(), store.countdown_len())
    }

    pub fn remaining(&self, id: &NotificationId) -> Option<u32> {
        self.store.lock().remaining(id)
    }

    /// Insert a notification directly, bypassing the generator
    pub fn push(&self, notification: TransferNotification) -> NotificationId {
        let id = self.store.lock().insert(notification.clone());
        self.events.emit(NotificationEvent::Arrived(notification));
        id
    }

    /// Insert with an explicit countdown, bypassing the generator
    pub fn push_with_countdown(&self, notification: TransferNotification, secs: u32) -> NotificationId {
        let id = self.store.lock().insert_with_countdown(notification.clone(), secs);
        self.events.emit(NotificationEvent::Arrived(notification));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::TransferRequest;

    fn notification(customer: &str) -> TransferNotification {
        TransferNotification::from_request(TransferRequest::new("Agent Sun", customer, "Overflow"))
    }

    fn presenter() -> NotificationPresenter {
        NotificationPresenter::new(30, EventEmitter::new(16))
    }

    #[test]
    fn test_empty_renders_nothing() {
        let mut presenter = presenter();
        assert!(presenter.view().is_none());
        presenter.set_expanded(true);
        assert!(presenter.view().is_none());
    }

    #[test]
    fn test_collapsed_shows_latest_only() {
        let presenter = presenter();
        presenter.push(notification("older"));
        let newest = presenter.push(notification("newer"));

        match presenter.view() {
            Some(PanelView::Collapsed { latest, hidden }) => {
                assert_eq!(latest.notification.id, newest);
                assert_eq!(latest.remaining_secs, 30);
                assert_eq!(hidden, 1);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_expanded_lists_all_newest_last() {
        let mut presenter = presenter();
        presenter.push(notification("first"));
        presenter.push(notification("second"));
        assert!(presenter.toggle_expanded());

        let view = presenter.view().unwrap();
        let names: Vec<_> = view
            .cards()
            .iter()
            .map(|c| c.notification.customer_name.clone())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_accept_and_reject_publish_resolution() {
        let presenter = presenter();
        let mut events = presenter.events().subscribe();
        let a = presenter.push(notification("a"));
        let b = presenter.push(notification("b"));
        events.recv().await.unwrap();
        events.recv().await.unwrap();

        assert!(presenter.accept(&a).is_some());
        assert!(presenter.reject(&b).is_some());
        assert!(presenter.accept(&a).is_none());

        match events.recv().await.unwrap() {
            NotificationEvent::Resolved { notification, resolution } => {
                assert_eq!(notification.id, a);
                assert_eq!(resolution, Resolution::Accepted);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        match events.recv().await.unwrap() {
            NotificationEvent::Resolved { resolution, .. } => {
                assert_eq!(resolution, Resolution::Rejected)
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(events.try_recv().is_err());
        assert_eq!(presenter.counts(), (0, 0));
    }

    #[test]
    fn test_dismiss_all_clears_in_one_step() {
        let presenter = presenter();
        for name in ["a", "b", "c"] {
            presenter.push(notification(name));
        }
        assert_eq!(presenter.counts(), (3, 3));

        assert_eq!(presenter.dismiss_all(), 3);
        assert_eq!(presenter.counts(), (0, 0));
        assert!(presenter.view().is_none());
        assert_eq!(presenter.dismiss_all(), 0);
    }
}
