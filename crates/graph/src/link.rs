//! Edge of the schema graph.

use crate::direction::Direction;
use vista_core::{FieldId, TableId};

/// Two tables connected by a foreign key field.
///
/// `source` declares `field`, `target` is the table it references. Both are
/// the same table for a self-reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    field: FieldId,
    target: TableId,
}

impl Link {
    /// Creates the link for `field` referencing `target`.
    #[inline]
    pub fn new(field: FieldId, target: TableId) -> Self {
        Self { field, target }
    }

    /// The foreign key field.
    #[inline]
    pub fn field(&self) -> FieldId {
        self.field
    }

    /// The table declaring the field.
    #[inline]
    pub fn source(&self) -> TableId {
        self.field.table
    }

    /// The referenced table.
    #[inline]
    pub fn target(&self) -> TableId {
        self.target
    }

    /// Whether the field references its own table.
    #[inline]
    pub fn is_self_reference(&self) -> bool {
        self.source() == self.target
    }

    /// Whether `table` is one of the two ends.
    #[inline]
    pub fn touches(&self, table: TableId) -> bool {
        self.source() == table || self.target == table
    }

    /// The end of this link that is not `table`, `None` if `table` is not
    /// an end at all.
    pub fn opposite(&self, table: TableId) -> Option<TableId> {
        if table == self.source() {
            Some(self.target)
        } else if table == self.target {
            Some(self.source())
        } else {
            None
        }
    }

    /// The direction of crossing this link starting at `table`.
    ///
    /// `Unresolved` for a self-reference, `None` if `table` is not an end.
    pub fn direction_from(&self, table: TableId) -> Option<Direction> {
        if !self.touches(table) {
            None
        } else if self.is_self_reference() {
            Some(Direction::Unresolved)
        } else {
            Some(Direction::from_foreign(table == self.source()))
        }
    }
}
