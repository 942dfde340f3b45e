//! Row-value graph: a row and the rows reached from it.

use vista_core::{Row, RowId, TableId, UNDEFINED_ID};
use vista_graph::Step;

/// The rows reached from a node by crossing one step.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    step: Step,
    targets: Vec<RowNode>,
}

impl Edge {
    pub(crate) fn new(step: Step, targets: Vec<RowNode>) -> Self {
        Self { step, targets }
    }

    /// The step crossed.
    #[inline]
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// The nodes reached, in row id order.
    #[inline]
    pub fn targets(&self) -> &[RowNode] {
        &self.targets
    }

    pub(crate) fn set_targets(&mut self, targets: Vec<RowNode>) {
        self.targets = targets;
    }
}

/// A node of a materialized line.
///
/// A node either holds the row it designates or is a placeholder for a row
/// that could not be resolved (dangling or empty foreign key). Placeholders
/// have no edges.
#[derive(Clone, Debug, PartialEq)]
pub struct RowNode {
    table: TableId,
    row: Option<Row>,
    edges: Vec<Edge>,
}

impl RowNode {
    /// A resolved node without edges.
    pub fn resolved(row: Row) -> Self {
        Self {
            table: row.table(),
            row: Some(row),
            edges: Vec::new(),
        }
    }

    /// An unresolved node of `table`.
    pub fn placeholder(table: TableId) -> Self {
        Self {
            table,
            row: None,
            edges: Vec::new(),
        }
    }

    #[inline]
    pub fn table(&self) -> TableId {
        self.table
    }

    #[inline]
    pub fn row(&self) -> Option<&Row> {
        self.row.as_ref()
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.row.is_some()
    }

    /// The id of the row, `UNDEFINED_ID` for a placeholder.
    pub fn id(&self) -> RowId {
        self.row.as_ref().map_or(UNDEFINED_ID, Row::id)
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The nodes reached by `step`, empty if this node has no such edge.
    pub fn follow(&self, step: &Step) -> &[RowNode] {
        self.edges
            .iter()
            .find(|e| &e.step == step)
            .map(|e| e.targets.as_slice())
            .unwrap_or(&[])
    }

    /// Every node reached by walking `steps`.
    pub fn follow_path_all(&self, steps: &[Step]) -> Vec<&RowNode> {
        let mut current = vec![self];
        for step in steps {
            current = current.into_iter().flat_map(|n| n.follow(step)).collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// The first resolved node reached by walking `steps`.
    pub fn follow_path(&self, steps: &[Step]) -> Option<&RowNode> {
        self.follow_path_all(steps)
            .into_iter()
            .find(|n| n.is_resolved())
    }

    /// Counts the nodes of this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self
            .edges
            .iter()
            .flat_map(|e| e.targets.iter())
            .map(RowNode::node_count)
            .sum::<usize>()
    }

    /// Calls `f` on every node of this subtree, depth-first.
    pub fn for_each(&self, f: &mut impl FnMut(&RowNode)) {
        f(self);
        for edge in &self.edges {
            for target in &edge.targets {
                target.for_each(f);
            }
        }
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub(crate) fn edge_mut(&mut self, step: &Step) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| &e.step == step)
    }

    /// Calls `f` on every node reached by walking `steps`, returning how many
    /// nodes were visited.
    pub(crate) fn for_each_at_mut(
        &mut self,
        steps: &[Step],
        f: &mut impl FnMut(&mut RowNode),
    ) -> usize {
        let Some((first, rest)) = steps.split_first() else {
            f(self);
            return 1;
        };
        let mut count = 0;
        for edge in self.edges.iter_mut().filter(|e| &e.step == first) {
            for target in &mut edge.targets {
                count += target.for_each_at_mut(rest, f);
            }
        }
        count
    }
}
