//! Changes of the visible lines of a queue.
//!
//! A `ListChange` is published to subscribers after every task that changed
//! what is shown. Lines are designated by the id of their root row.

use vista_core::RowId;

/// The difference between two states of the visible list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListChange {
    /// Lines that became visible
    pub added: Vec<RowId>,
    /// Lines that are no longer visible
    pub removed: Vec<RowId>,
    /// Visible lines whose content changed
    pub modified: Vec<RowId>,
    /// Every visible line after the change, in list order
    pub visible: Vec<RowId>,
    /// Whether the change comes from a full filter pass
    pub full: bool,
}

impl ListChange {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A change produced by a full filter pass.
    pub fn full_pass() -> Self {
        Self {
            full: true,
            ..Self::default()
        }
    }

    /// Returns true if no line was added, removed or modified.
    ///
    /// A full pass is never empty: it always republishes the visible list.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.full && self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Returns the number of added, removed and modified lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    /// Records a line whose visibility went from `was` to `now`.
    pub(crate) fn record(&mut self, id: RowId, was: bool, now: bool) {
        match (was, now) {
            (false, true) => self.added.push(id),
            (true, false) => self.removed.push(id),
            (true, true) => self.modified.push(id),
            (false, false) => {}
        }
    }
}
