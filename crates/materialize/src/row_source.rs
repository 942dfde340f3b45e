//! Where rows are fetched from.

use hashbrown::HashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use vista_core::{ColumnId, FieldId, Row, RowId, TableId, Value};

/// Read access to the rows of a database.
///
/// Implementations are shared between the caller and the search worker, so
/// they must be usable from any thread.
pub trait RowSource: Send + Sync {
    /// Fetches the row `id` of `table`.
    fn fetch(&self, table: TableId, id: RowId) -> Option<Row>;

    /// Fetches the rows whose foreign key `field` holds `id`, ordered by id.
    fn referents(&self, field: FieldId, id: RowId) -> Vec<Row>;
}

/// Rows kept in memory, per table and ordered by id.
#[derive(Debug, Default)]
pub struct MemoryRowSource {
    tables: RwLock<HashMap<TableId, BTreeMap<RowId, Row>>>,
}

impl MemoryRowSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a row, returning the previous one.
    pub fn put(&self, row: Row) -> Option<Row> {
        self.tables
            .write()
            .entry(row.table())
            .or_default()
            .insert(row.id(), row)
    }

    /// Removes a row.
    pub fn remove(&self, table: TableId, id: RowId) -> Option<Row> {
        self.tables.write().get_mut(&table)?.remove(&id)
    }

    /// Sets a single value of a stored row and bumps its version.
    ///
    /// Returns the updated row, `None` if the row or the column is missing.
    pub fn update_value(
        &self,
        table: TableId,
        id: RowId,
        column: ColumnId,
        value: Value,
    ) -> Option<Row> {
        let mut tables = self.tables.write();
        let row = tables.get_mut(&table)?.get_mut(&id)?;
        if !row.set(column, value) {
            return None;
        }
        row.increment_version();
        Some(row.clone())
    }

    /// Returns every row of `table`, ordered by id.
    pub fn rows(&self, table: TableId) -> Vec<Row> {
        self.tables
            .read()
            .get(&table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the number of rows of `table`.
    pub fn len(&self, table: TableId) -> usize {
        self.tables.read().get(&table).map_or(0, BTreeMap::len)
    }

    /// Returns true if no table holds any row.
    pub fn is_empty(&self) -> bool {
        self.tables.read().values().all(BTreeMap::is_empty)
    }
}

impl RowSource for MemoryRowSource {
    fn fetch(&self, table: TableId, id: RowId) -> Option<Row> {
        self.tables.read().get(&table)?.get(&id).cloned()
    }

    fn referents(&self, field: FieldId, id: RowId) -> Vec<Row> {
        let tables = self.tables.read();
        let Some(rows) = tables.get(&field.table) else {
            return Vec::new();
        };
        rows.values()
            .filter(|row| row.foreign_id(field.column) == Some(id))
            .cloned()
            .collect()
    }
}
