//! Schema module for Vista.
//!
//! This module contains all schema-related definitions: fields (foreign keys
//! included), tables and the schema snapshot tying them together.

mod catalog;
mod field;
mod table;

pub use catalog::{Schema, SchemaBuilder};
pub use field::Field;
pub use table::{Table, TableBuilder};

use core::fmt;

/// Identifier of a table within a schema.
pub type TableId = u32;

/// Position of a field within its table.
pub type ColumnId = usize;

/// Identifier of a field: the declaring table and the field position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub table: TableId,
    pub column: ColumnId,
}

impl FieldId {
    /// Creates a field identifier.
    #[inline]
    pub const fn new(table: TableId, column: ColumnId) -> Self {
        Self { table, column }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.table, self.column)
    }
}
