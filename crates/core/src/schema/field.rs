//! Field definition for Vista schemas.

use super::{ColumnId, FieldId, TableId};
use crate::types::DataType;

/// A field of a table.
///
/// A field carrying a referenced table is a foreign key: its values are ids
/// of rows of that table.
#[derive(Clone, Debug)]
pub struct Field {
    /// Field name.
    name: String,
    /// Data type of the field.
    data_type: DataType,
    /// Whether this field allows null values.
    nullable: bool,
    /// Table declaring this field.
    table: TableId,
    /// Field index in the table (0-based).
    index: ColumnId,
    /// Table referenced by this field, if it is a foreign key.
    references: Option<TableId>,
}

impl Field {
    /// Creates a new field definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: data_type.is_nullable_by_default(),
            table: 0,
            index: 0,
            references: None,
        }
    }

    /// Sets whether this field is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub(crate) fn with_position(mut self, table: TableId, index: ColumnId) -> Self {
        self.table = table;
        self.index = index;
        self
    }

    pub(crate) fn with_reference(mut self, target: TableId) -> Self {
        self.references = Some(target);
        self
    }

    /// Returns the field name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the data type.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns whether this field is nullable.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the table declaring this field.
    #[inline]
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Returns the field index.
    #[inline]
    pub fn index(&self) -> ColumnId {
        self.index
    }

    /// Returns the identifier of this field.
    #[inline]
    pub fn id(&self) -> FieldId {
        FieldId::new(self.table, self.index)
    }

    /// Returns the referenced table if this field is a foreign key.
    #[inline]
    pub fn references(&self) -> Option<TableId> {
        self.references
    }

    /// Returns whether this field is a foreign key.
    #[inline]
    pub fn is_foreign_key(&self) -> bool {
        self.references.is_some()
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id() && self.name == other.name && self.data_type == other.data_type
    }
}
