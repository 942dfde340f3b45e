//! One line of a view.

use crate::materializer::Materializer;
use crate::row_node::RowNode;
use vista_core::{Row, RowId, TableId};
use vista_graph::Path;

/// A root row and every row reached from it.
///
/// Lines are identified by the id of their root row.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    root: RowNode,
}

impl Line {
    pub fn new(root: RowNode) -> Self {
        Self { root }
    }

    /// The id of the root row.
    #[inline]
    pub fn id(&self) -> RowId {
        self.root.id()
    }

    /// The root table.
    #[inline]
    pub fn table(&self) -> TableId {
        self.root.table()
    }

    /// The root row, `None` if it was deleted since the line was built.
    #[inline]
    pub fn row(&self) -> Option<&Row> {
        self.root.row()
    }

    /// The row-value graph of this line.
    #[inline]
    pub fn graph(&self) -> &RowNode {
        &self.root
    }

    /// The first resolved node at the end of `path`.
    pub fn follow_path(&self, path: &Path) -> Option<&RowNode> {
        if path.from() != self.table() {
            return None;
        }
        self.root.follow_path(path.steps())
    }

    /// Every node at the end of `path`, placeholders included.
    pub fn follow_path_all(&self, path: &Path) -> Vec<&RowNode> {
        if path.from() != self.table() {
            return Vec::new();
        }
        self.root.follow_path_all(path.steps())
    }

    /// Whether the row `id` is found at the end of `path`.
    pub fn hits(&self, path: &Path, id: RowId) -> bool {
        self.follow_path_all(path).iter().any(|n| n.id() == id)
    }

    /// Re-resolves the nodes at `path` designating row `id`.
    ///
    /// See [`Materializer::refresh`].
    pub fn refresh(&mut self, path: &Path, id: RowId, materializer: &Materializer) -> usize {
        materializer.refresh(self, path, id)
    }

    pub(crate) fn root_mut(&mut self) -> &mut RowNode {
        &mut self.root
    }
}
