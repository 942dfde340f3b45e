//! Builds lines by following the prototype of a view.

use crate::line::Line;
use crate::prototype::{Prototype, PrototypeNode, PrototypeOptions};
use crate::row_node::{Edge, RowNode};
use crate::row_source::RowSource;
use std::sync::Arc;
use vista_core::{Result, Row, RowId, TableId};
use vista_graph::{DatabaseGraph, Path, Step};

/// Materializes root rows into lines.
///
/// Every hop of the prototype is resolved against the row source: a foreign
/// step yields exactly one node (a placeholder if the key is empty or
/// dangling), a referent step yields one node per referencing row.
/// Placeholders are never expanded further.
#[derive(Clone)]
pub struct Materializer {
    prototype: Arc<Prototype>,
    source: Arc<dyn RowSource>,
}

impl Materializer {
    pub fn new(prototype: Arc<Prototype>, source: Arc<dyn RowSource>) -> Self {
        Self { prototype, source }
    }

    /// Builds the prototype of `root` and a materializer over it.
    pub fn build(
        graph: &DatabaseGraph,
        root: TableId,
        options: PrototypeOptions,
        source: Arc<dyn RowSource>,
    ) -> Result<Self> {
        let prototype = Prototype::build(graph, root, options)?;
        Ok(Self::new(Arc::new(prototype), source))
    }

    #[inline]
    pub fn prototype(&self) -> &Arc<Prototype> {
        &self.prototype
    }

    #[inline]
    pub fn source(&self) -> &Arc<dyn RowSource> {
        &self.source
    }

    /// Materializes `row` into its full row-value graph.
    pub fn materialize(&self, row: Row) -> RowNode {
        self.expand(self.prototype.root(), row)
    }

    /// Materializes `row` as a line.
    pub fn line(&self, row: Row) -> Line {
        Line::new(self.materialize(row))
    }

    /// Fetches the root row `id` and materializes it.
    pub fn load(&self, id: RowId) -> Option<Line> {
        let row = self.source.fetch(self.prototype.root_table(), id)?;
        Some(self.line(row))
    }

    /// Re-resolves every node of `line` at `path` whose row is `id`, together
    /// with the subtree below it. Returns the number of subtrees replaced.
    ///
    /// A node whose row no longer exists becomes a placeholder. When `path`
    /// ends with a referent step, the row may have left its parent or joined
    /// another one: the edges of both parents are rebuilt instead.
    pub fn refresh(&self, line: &mut Line, path: &Path, id: RowId) -> usize {
        let Some(node) = self.prototype.node(path) else {
            tracing::trace!(path = %path, "path outside of prototype, nothing to refresh");
            return 0;
        };
        let fresh = self.source.fetch(path.to(), id);
        let refreshed = match path.last_step() {
            Some(step) if step.is_foreign() == Some(false) => {
                self.refresh_referents(line, path, step, node, id, fresh.as_ref())
            }
            _ => self.refresh_nodes(line, path, node, id, fresh.as_ref()),
        };
        if refreshed > 0 {
            tracing::trace!(line = line.id(), path = %path, id, refreshed, "refreshed line");
        }
        refreshed
    }

    fn refresh_nodes(
        &self,
        line: &mut Line,
        path: &Path,
        node: &PrototypeNode,
        id: RowId,
        fresh: Option<&Row>,
    ) -> usize {
        let mut refreshed = 0;
        line.root_mut().for_each_at_mut(path.steps(), &mut |target| {
            if target.id() != id {
                return;
            }
            *target = match fresh {
                Some(row) => self.expand(node, row.clone()),
                None => RowNode::placeholder(path.to()),
            };
            refreshed += 1;
        });
        refreshed
    }

    // parents holding `id`, and the parent its key now designates
    fn refresh_referents(
        &self,
        line: &mut Line,
        path: &Path,
        step: &Step,
        node: &PrototypeNode,
        id: RowId,
        fresh: Option<&Row>,
    ) -> usize {
        let Some(field) = step.single_field() else {
            return 0;
        };
        let new_parent = fresh.and_then(|row| row.foreign_id(field.column));
        let parents = &path.steps()[..path.len() - 1];

        let mut refreshed = 0;
        line.root_mut().for_each_at_mut(parents, &mut |parent| {
            let holds = parent.follow(step).iter().any(|n| n.id() == id);
            let targets = match parent.row() {
                Some(row) if holds || new_parent == Some(row.id()) => {
                    self.targets(row, step, node)
                }
                _ => return,
            };
            if let Some(edge) = parent.edge_mut(step) {
                edge.set_targets(targets);
                refreshed += 1;
            }
        });
        refreshed
    }

    fn expand(&self, node: &PrototypeNode, row: Row) -> RowNode {
        let edges: Vec<Edge> = node
            .children()
            .iter()
            .filter_map(|child| {
                let step = child.step()?;
                Some(Edge::new(step.clone(), self.targets(&row, step, child)))
            })
            .collect();

        let mut result = RowNode::resolved(row);
        for edge in edges {
            result.push_edge(edge);
        }
        result
    }

    fn targets(&self, row: &Row, step: &Step, child: &PrototypeNode) -> Vec<RowNode> {
        let Some(field) = step.single_field() else {
            return Vec::new();
        };
        match step.is_foreign() {
            Some(true) => {
                let target = row
                    .foreign_id(field.column)
                    .and_then(|id| self.source.fetch(step.to(), id));
                match target {
                    Some(target) => vec![self.expand(child, target)],
                    None => vec![RowNode::placeholder(step.to())],
                }
            }
            Some(false) if row.has_valid_id() => self
                .source
                .referents(field, row.id())
                .into_iter()
                .map(|r| self.expand(child, r))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl core::fmt::Debug for Materializer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Materializer")
            .field("root", &self.prototype.root_table())
            .field("paths", &self.prototype.paths().len())
            .finish()
    }
}
