//! Row change notifications.

use core::fmt;
use vista_core::{ColumnId, RowId, TableId};

/// A row of `table` was inserted, updated or deleted.
///
/// `columns` lists the changed fields; it is informational only, every
/// change re-resolves the whole subtree below the row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowChange {
    pub table: TableId,
    pub id: RowId,
    pub columns: Vec<ColumnId>,
}

impl RowChange {
    pub fn new(table: TableId, id: RowId, columns: impl IntoIterator<Item = ColumnId>) -> Self {
        let mut columns: Vec<ColumnId> = columns.into_iter().collect();
        columns.sort_unstable();
        columns.dedup();
        Self { table, id, columns }
    }

    /// A change without column information.
    pub fn row(table: TableId, id: RowId) -> Self {
        Self::new(table, id, [])
    }
}

impl fmt::Display for RowChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}[{}] {:?}", self.table, self.id, self.columns)
    }
}
