//! Observers of a queue's list changes.
//!
//! Callbacks run on the search worker thread, after the task that produced
//! the change, and outside of any queue lock: a callback may subscribe or
//! unsubscribe, including itself.

use crate::list_change::ListChange;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback type for change notifications.
pub type ChangeCallback = Arc<dyn Fn(&ListChange) + Send + Sync>;

/// The subscriptions of a queue, in subscription order.
pub(crate) struct SubscriptionManager {
    callbacks: BTreeMap<SubscriptionId, ChangeCallback>,
    next_id: SubscriptionId,
}

impl SubscriptionManager {
    pub(crate) fn new() -> Self {
        Self {
            callbacks: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub(crate) fn subscribe(&mut self, callback: ChangeCallback) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.insert(id, callback);
        id
    }

    /// Returns true if the subscription was found and removed.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.callbacks.remove(&id).is_some()
    }

    /// The current callbacks, to be called once the lock is released.
    ///
    /// A subscription removed after the snapshot still sees the change it
    /// was taken for.
    pub(crate) fn snapshot(&self) -> Vec<ChangeCallback> {
        self.callbacks.values().cloned().collect()
    }
}
