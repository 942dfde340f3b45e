//! Routing of row changes to the queues that depend on them.
//!
//! A `ChangeFeed` tracks listeners by the tables they depend on. When a row
//! changes, only the listeners whose tables include the changed one are
//! notified. Listeners are held weakly: a dropped queue silently stops
//! receiving changes and is purged on the next `cleanup`.

use crate::change::RowChange;
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use vista_core::TableId;

/// Unique identifier for a registered listener.
pub type ListenerId = u64;

/// Receives the row changes of the tables it depends on.
pub trait ChangeListener: Send + Sync {
    /// The tables whose changes this listener wants.
    fn tables(&self) -> Vec<TableId>;

    /// Called for every change of one of `tables()`.
    fn on_row_change(&self, change: &RowChange);
}

struct FeedInner {
    /// Table ID -> listeners that depend on it
    by_table: HashMap<TableId, Vec<(ListenerId, Weak<dyn ChangeListener>)>>,
    /// Listener ID -> listener (for unregistration)
    listeners: HashMap<ListenerId, Weak<dyn ChangeListener>>,
    next_id: ListenerId,
}

/// A registry that routes row changes to listeners.
pub struct ChangeFeed {
    inner: RwLock<FeedInner>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(FeedInner {
                by_table: HashMap::new(),
                listeners: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Registers a listener and returns its ID.
    pub fn register(&self, listener: &Arc<dyn ChangeListener>) -> ListenerId {
        let weak = Arc::downgrade(listener);
        let tables = listener.tables();

        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;
        for table in tables {
            inner
                .by_table
                .entry(table)
                .or_default()
                .push((id, weak.clone()));
        }
        inner.listeners.insert(id, weak);
        tracing::debug!(listener = id, "registered change listener");
        id
    }

    /// Unregisters a listener by ID.
    ///
    /// Returns true if the listener was found and removed.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.write();
        if inner.listeners.remove(&id).is_none() {
            return false;
        }
        for listeners in inner.by_table.values_mut() {
            listeners.retain(|(l, _)| *l != id);
        }
        inner.by_table.retain(|_, v| !v.is_empty());
        tracing::debug!(listener = id, "unregistered change listener");
        true
    }

    /// Delivers `change` to every live listener of its table.
    ///
    /// Returns the number of listeners notified. Listeners are called
    /// outside of the registry lock.
    pub fn publish(&self, change: &RowChange) -> usize {
        let targets: Vec<Arc<dyn ChangeListener>> = {
            let inner = self.inner.read();
            inner
                .by_table
                .get(&change.table)
                .map(|v| v.iter().filter_map(|(_, w)| w.upgrade()).collect())
                .unwrap_or_default()
        };
        for listener in &targets {
            listener.on_row_change(change);
        }
        targets.len()
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.read().listeners.len()
    }

    /// Returns the number of live listeners depending on `table`.
    pub fn listeners_for_table(&self, table: TableId) -> usize {
        self.inner
            .read()
            .by_table
            .get(&table)
            .map(|v| v.iter().filter(|(_, w)| w.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Drops the entries of listeners that no longer exist.
    pub fn cleanup(&self) {
        let mut inner = self.inner.write();
        for listeners in inner.by_table.values_mut() {
            listeners.retain(|(_, w)| w.strong_count() > 0);
        }
        inner.by_table.retain(|_, v| !v.is_empty());
        inner.listeners.retain(|_, w| w.strong_count() > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recorder {
        tables: Vec<TableId>,
        seen: Mutex<Vec<RowChange>>,
    }

    impl ChangeListener for Recorder {
        fn tables(&self) -> Vec<TableId> {
            self.tables.clone()
        }

        fn on_row_change(&self, change: &RowChange) {
            self.seen.lock().push(change.clone());
        }
    }

    fn recorder(tables: &[TableId]) -> Arc<Recorder> {
        Arc::new(Recorder {
            tables: tables.to_vec(),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[test]
    fn test_feed_routes_by_table() {
        let feed = ChangeFeed::new();
        let a = recorder(&[0, 1]);
        let b = recorder(&[1]);
        let a_dyn: Arc<dyn ChangeListener> = a.clone();
        let b_dyn: Arc<dyn ChangeListener> = b.clone();
        feed.register(&a_dyn);
        feed.register(&b_dyn);

        assert_eq!(feed.publish(&RowChange::row(0, 7)), 1);
        assert_eq!(feed.publish(&RowChange::row(1, 2)), 2);
        assert_eq!(feed.publish(&RowChange::row(3, 1)), 0);

        assert_eq!(a.seen.lock().len(), 2);
        assert_eq!(b.seen.lock().as_slice(), &[RowChange::row(1, 2)]);
    }

    #[test]
    fn test_feed_unregister() {
        let feed = ChangeFeed::new();
        let a: Arc<dyn ChangeListener> = recorder(&[0]);
        let id = feed.register(&a);
        assert_eq!(feed.listeners_for_table(0), 1);

        assert!(feed.unregister(id));
        assert!(!feed.unregister(id));
        assert_eq!(feed.listener_count(), 0);
        assert_eq!(feed.publish(&RowChange::row(0, 1)), 0);
    }

    #[test]
    fn test_feed_dropped_listener() {
        let feed = ChangeFeed::new();
        let a: Arc<dyn ChangeListener> = recorder(&[0, 2]);
        feed.register(&a);
        drop(a);

        assert_eq!(feed.listeners_for_table(0), 0);
        assert_eq!(feed.publish(&RowChange::row(0, 1)), 0);
        assert_eq!(feed.listener_count(), 1);
        feed.cleanup();
        assert_eq!(feed.listener_count(), 0);
    }
}
