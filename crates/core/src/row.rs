//! Row structure for Vista.
//!
//! This module defines the `Row` struct which represents a single row of a
//! table, together with the id sentinels.

use crate::error::{Error, Result};
use crate::schema::{ColumnId, TableId};
use crate::value::Value;

/// Identifier of a persisted row.
pub type RowId = i64;

/// The smallest id a persisted row can have.
pub const MIN_VALID_ID: RowId = 0;

/// Id reported by nodes that carry no row, such as unresolved placeholders.
pub const UNDEFINED_ID: RowId = RowId::MIN;

/// Checks that `id` designates a persisted row.
pub fn validate_row_id(id: RowId) -> Result<RowId> {
    if id < MIN_VALID_ID {
        Err(Error::InvalidRowId { id })
    } else {
        Ok(id)
    }
}

/// A row of a table.
#[derive(Clone, Debug)]
pub struct Row {
    /// Table this row belongs to.
    table: TableId,
    /// Identifier of this row.
    id: RowId,
    /// Version number for change detection. Incremented on each update.
    version: u64,
    /// Values stored in this row, indexed by field position.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given ID and values.
    /// Version defaults to 1 for new rows.
    pub fn new(table: TableId, id: RowId, values: Vec<Value>) -> Self {
        Self {
            table,
            id,
            version: 1,
            values,
        }
    }

    /// Returns the table of this row.
    #[inline]
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Returns the row ID.
    #[inline]
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Returns true if this row carries a persisted id.
    #[inline]
    pub fn has_valid_id(&self) -> bool {
        self.id >= MIN_VALID_ID
    }

    /// Returns the version number.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Increments the version number and returns the new value.
    #[inline]
    pub fn increment_version(&mut self) -> u64 {
        self.version = self.version.wrapping_add(1);
        self.version
    }

    /// Returns a reference to the values.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Gets a value at the given field index.
    pub fn get(&self, index: ColumnId) -> Option<&Value> {
        self.values.get(index)
    }

    /// Sets a value at the given field index.
    pub fn set(&mut self, index: ColumnId, value: Value) -> bool {
        if index < self.values.len() {
            self.values[index] = value;
            true
        } else {
            false
        }
    }

    /// Returns the id referenced by the foreign key stored at `index`, if it
    /// designates a persisted row.
    pub fn foreign_id(&self, index: ColumnId) -> Option<RowId> {
        self.get(index)
            .and_then(Value::as_row_id)
            .filter(|id| *id >= MIN_VALID_ID)
    }

    /// Returns the number of values in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table && self.id == other.id && self.values == other.values
    }
}

impl Eq for Row {}
