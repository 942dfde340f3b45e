//! Bounded walk of every path leaving a root table.

use hashbrown::HashMap;
use vista_core::{FieldId, Result, TableId};
use vista_graph::{DatabaseGraph, Direction, Path, Step};

/// Knobs of the prototype walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrototypeOptions {
    /// Maximum number of steps of a path.
    pub max_depth: usize,
    /// Whether to cross foreign keys away from their reference, i.e. from a
    /// row to the rows referencing it.
    pub follow_referents: bool,
}

impl Default for PrototypeOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            follow_referents: false,
        }
    }
}

impl PrototypeOptions {
    /// Sets the maximum number of steps.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets whether referent steps are walked.
    pub fn follow_referents(mut self, follow: bool) -> Self {
        self.follow_referents = follow;
        self
    }
}

/// A node of the prototype tree: the table reached by `path`.
///
/// Children only ever cross a single field, so that every node of a
/// materialized line maps to exactly one relationship.
#[derive(Clone, Debug)]
pub struct PrototypeNode {
    path: Path,
    children: Vec<PrototypeNode>,
}

impl PrototypeNode {
    fn new(path: Path) -> Self {
        Self {
            path,
            children: Vec::new(),
        }
    }

    /// The table of this node.
    #[inline]
    pub fn table(&self) -> TableId {
        self.path.to()
    }

    /// The path from the root to this node.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The step leading to this node, `None` for the root.
    #[inline]
    pub fn step(&self) -> Option<&Step> {
        self.path.last_step()
    }

    /// The nodes one step further.
    #[inline]
    pub fn children(&self) -> &[PrototypeNode] {
        &self.children
    }

    /// Finds the child reached by `step`.
    pub fn child(&self, step: &Step) -> Option<&PrototypeNode> {
        self.children.iter().find(|c| c.step() == Some(step))
    }

    fn collect_paths(&self, acc: &mut Vec<Path>) {
        acc.push(self.path.clone());
        for child in &self.children {
            child.collect_paths(acc);
        }
    }
}

/// Every path from a root table up to a bounded number of steps.
///
/// Computed once per view and shared by all its lines. Paths are listed in
/// depth-first order, the empty path (the root row itself) first, and are
/// also indexed by the table they end at.
#[derive(Clone, Debug)]
pub struct Prototype {
    root: PrototypeNode,
    options: PrototypeOptions,
    paths: Vec<Path>,
    by_table: HashMap<TableId, Vec<Path>>,
}

impl Prototype {
    /// Walks the graph from `root`.
    pub fn build(graph: &DatabaseGraph, root: TableId, options: PrototypeOptions) -> Result<Self> {
        let mut root_node = PrototypeNode::new(Path::new(root));
        expand(graph, &mut root_node, None, &options)?;

        let mut paths = Vec::new();
        root_node.collect_paths(&mut paths);

        let mut by_table: HashMap<TableId, Vec<Path>> = HashMap::new();
        for path in &paths {
            by_table.entry(path.to()).or_default().push(path.clone());
        }

        tracing::debug!(
            root,
            paths = paths.len(),
            tables = by_table.len(),
            max_depth = options.max_depth,
            "built prototype"
        );

        Ok(Self {
            root: root_node,
            options,
            paths,
            by_table,
        })
    }

    /// The root table.
    #[inline]
    pub fn root_table(&self) -> TableId {
        self.root.table()
    }

    /// The root of the prototype tree.
    #[inline]
    pub fn root(&self) -> &PrototypeNode {
        &self.root
    }

    /// The options this prototype was built with.
    #[inline]
    pub fn options(&self) -> PrototypeOptions {
        self.options
    }

    /// Every path, depth-first.
    #[inline]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// The paths ending at `table`.
    pub fn paths_to(&self, table: TableId) -> &[Path] {
        self.by_table
            .get(&table)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether some path reaches `table`.
    pub fn reaches(&self, table: TableId) -> bool {
        self.by_table.contains_key(&table)
    }

    /// The tables reached by at least one path.
    pub fn tables(&self) -> impl Iterator<Item = TableId> + '_ {
        self.by_table.keys().copied()
    }

    /// Finds the prototype node at the end of `path`.
    pub fn node(&self, path: &Path) -> Option<&PrototypeNode> {
        if path.from() != self.root_table() {
            return None;
        }
        path.steps()
            .iter()
            .try_fold(&self.root, |node, step| node.child(step))
    }
}

fn expand(
    graph: &DatabaseGraph,
    node: &mut PrototypeNode,
    via: Option<(FieldId, Direction)>,
    options: &PrototypeOptions,
) -> Result<()> {
    if node.path.len() >= options.max_depth {
        return Ok(());
    }
    let table = node.table();

    for link in graph.links(table) {
        let directions: &[Direction] = match link.direction_from(table) {
            Some(Direction::Unresolved) if options.follow_referents => {
                &[Direction::TowardReference, Direction::AwayFromReference]
            }
            Some(Direction::Unresolved) => &[Direction::TowardReference],
            Some(Direction::AwayFromReference) if !options.follow_referents => &[],
            Some(Direction::AwayFromReference) => &[Direction::AwayFromReference],
            Some(Direction::TowardReference) => &[Direction::TowardReference],
            None => &[],
        };

        for &direction in directions {
            // going straight back over the field just crossed
            if via == Some((link.field(), direction.reverse())) {
                continue;
            }
            let step = Step::from_field(graph, table, link.field(), direction)?;
            let mut child = PrototypeNode::new(node.path.with_step(step)?);
            expand(graph, &mut child, Some((link.field(), direction)), options)?;
            node.children.push(child);
        }
    }
    Ok(())
}
