//! # Notification Timer Store
//!
//! Holds the pending set of transfer notifications together with their
//! countdown entries. The two collections are always updated together:
//! a countdown exists if and only if its notification is pending.
//!
//! The store itself has no notion of time. Callers drive it with
//! [`NotificationStore::tick`], which the scheduler invokes once per tick
//! interval; tests drive it directly.
//!
//! ```rust
//! use agent_console::notification::{NotificationStore, TransferNotification, TransferRequest};
//!
//! let mut store = NotificationStore::new(3);
//! let n = TransferNotification::from_request(TransferRequest::new("Agent Li", "Zhang Wei", "VIP"));
//! let id = store.insert(n);
//!
//! assert!(store.tick().is_empty());
//! assert!(store.tick().is_empty());
//! let expired = store.tick();
//! assert_eq!(expired[0].id, id);
//! assert!(store.is_empty());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::types::{NotificationId, TransferNotification};

/// Store handle shared between the presenter and the scheduler tasks
pub type SharedStore = Arc<Mutex<NotificationStore>>;

/// Pending notifications and their remaining seconds
#[derive(Debug, Clone)]
pub struct NotificationStore {
    /// Pending notifications in arrival order, newest last
    pending: Vec<TransferNotification>,
    /// Remaining seconds keyed by notification id
    countdowns: HashMap<NotificationId, u32>,
    /// Countdown assigned by `insert`
    initial_countdown: u32,
}

impl NotificationStore {
    /// Create an empty store whose notifications start at `initial_countdown`
    pub fn new(initial_countdown: u32) -> Self {
        Self {
            pending: Vec::new(),
            countdowns: HashMap::new(),
            initial_countdown,
        }
    }

    /// Wrap a new store for sharing
    pub fn shared(initial_countdown: u32) -> SharedStore {
        Arc::new(Mutex::new(Self::new(initial_countdown)))
    }

    /// Countdown given to notifications added with [`insert`](Self::insert)
    pub fn initial_countdown(&self) -> u32 {
        self.initial_countdown
    }

    /// Add a notification with the default countdown
    pub fn insert(&mut self, notification: TransferNotification) -> NotificationId {
        let secs = self.initial_countdown;
        self.insert_with_countdown(notification, secs)
    }

    /// Add a notification with an explicit countdown
    ///
    /// Re-inserting an id that is already pending replaces the old entry.
    pub fn insert_with_countdown(
        &mut self,
        notification: TransferNotification,
        secs: u32,
    ) -> NotificationId {
        let id = notification.id;
        self.pending.retain(|n| n.id != id);
        self.pending.push(notification);
        self.countdowns.insert(id, secs);
        self.debug_check();
        id
    }

    /// Advance every countdown by one second
    ///
    /// Entries that reach zero are removed together with their notification
    /// and returned in arrival order.
    pub fn tick(&mut self) -> Vec<TransferNotification> {
        for remaining in self.countdowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }

        let countdowns = &self.countdowns;
        let (expired, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|n| countdowns.get(&n.id).map_or(true, |secs| *secs == 0));
        self.pending = pending;

        for notification in &expired {
            self.countdowns.remove(&notification.id);
        }
        self.debug_check();
        expired
    }

    /// Remove a notification and its countdown
    ///
    /// Missing ids are a no-op.
    pub fn remove(&mut self, id: &NotificationId) -> Option<TransferNotification> {
        let position = self.pending.iter().position(|n| &n.id == id)?;
        self.countdowns.remove(id);
        let removed = self.pending.remove(position);
        self.debug_check();
        Some(removed)
    }

    /// Remove everything, returning the notifications in arrival order
    pub fn clear(&mut self) -> Vec<TransferNotification> {
        self.countdowns.clear();
        std::mem::take(&mut self.pending)
    }

    /// Seconds left before `id` expires
    pub fn remaining(&self, id: &NotificationId) -> Option<u32> {
        self.countdowns.get(id).copied()
    }

    pub fn contains(&self, id: &NotificationId) -> bool {
        self.countdowns.contains_key(id)
    }

    /// Pending notifications, newest last
    pub fn pending(&self) -> &[TransferNotification] {
        &self.pending
    }

    /// Most recently added notification
    pub fn latest(&self) -> Option<&TransferNotification> {
        self.pending.last()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of countdown entries
    pub fn countdown_len(&self) -> usize {
        self.countdowns.len()
    }

    fn debug_check(&self) {
        debug_assert_eq!(
            self.pending.len(),
            self.countdowns.len(),
            "pending set and countdown entries out of step"
        );
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_COUNTDOWN_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::types::TransferRequest;

    fn notification(customer: &str) -> TransferNotification {
        TransferNotification::from_request(TransferRequest::new(
            "Agent Wang",
            customer,
            "Needs a specialist",
        ))
    }

    #[test]
    fn test_expires_on_thirtieth_tick() {
        let mut store = NotificationStore::new(30);
        let id = store.insert(notification("Li Na"));

        for tick in 1..30 {
            assert!(store.tick().is_empty(), "expired early on tick {}", tick);
            assert_eq!(store.remaining(&id), Some(30 - tick));
        }

        let expired = store.tick();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, id);
        assert!(store.is_empty());
        assert_eq!(store.countdown_len(), 0);
    }

    #[test]
    fn test_mixed_countdowns() {
        let mut store = NotificationStore::new(30);
        let a = store.insert_with_countdown(notification("A"), 5);
        let b = store.insert(notification("B"));

        for _ in 0..4 {
            assert!(store.tick().is_empty());
        }
        let expired = store.tick();

        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, a);
        assert_eq!(store.remaining(&b), Some(25));
        assert_eq!(store.len(), 1);
        assert_eq!(store.countdown_len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = NotificationStore::new(30);
        let id = store.insert(notification("C"));

        assert!(store.remove(&id).is_some());
        assert!(store.remove(&id).is_none());
        assert!(store.remove(&NotificationId::new()).is_none());
        assert_eq!(store.len(), store.countdown_len());
    }

    #[test]
    fn test_removed_before_expiry_never_expires() {
        let mut store = NotificationStore::new(30);
        let id = store.insert(notification("X"));

        for _ in 0..29 {
            store.tick();
        }
        assert_eq!(store.remaining(&id), Some(1));
        store.remove(&id);

        assert!(store.tick().is_empty());
        assert!(store.is_empty());
        assert_eq!(store.countdown_len(), 0);
    }

    #[test]
    fn test_pending_order_newest_last() {
        let mut store = NotificationStore::new(30);
        store.insert(notification("first"));
        store.insert(notification("second"));
        let newest = store.insert(notification("third"));

        assert_eq!(store.latest().map(|n| n.id), Some(newest));
        let names: Vec<_> = store.pending().iter().map(|n| n.customer_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_zero_countdown_expires_on_next_tick() {
        let mut store = NotificationStore::new(30);
        store.insert_with_countdown(notification("now"), 0);

        assert_eq!(store.tick().len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_returns_everything() {
        let mut store = NotificationStore::new(30);
        for name in ["a", "b", "c"] {
            store.insert(notification(name));
        }

        let cleared = store.clear();
        assert_eq!(cleared.len(), 3);
        assert_eq!(store.len(), 0);
        assert_eq!(store.countdown_len(), 0);
    }
}
