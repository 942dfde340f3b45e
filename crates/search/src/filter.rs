//! Line filters.

use std::sync::Arc;
use vista_core::ColumnId;
use vista_graph::Path;
use vista_materialize::Line;

/// Decides whether a line is shown.
///
/// Filters run on the search worker and must be pure. They see unresolved
/// placeholders wherever a foreign key is empty or dangling.
pub trait Filter: Send + Sync {
    fn matches(&self, line: &Line) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&Line) -> bool + Send + Sync,
{
    fn matches(&self, line: &Line) -> bool {
        self(line)
    }
}

/// The filter of a queue, `None` shows every line.
pub type FilterSpec = Option<Arc<dyn Filter>>;

/// Evaluates `spec` against `line`.
pub fn matches(spec: &FilterSpec, line: &Line) -> bool {
    spec.as_ref().map_or(true, |f| f.matches(line))
}

/// Case-insensitive text search in the rows reached by a path.
#[derive(Clone, Debug)]
pub struct ContainsFilter {
    path: Path,
    column: Option<ColumnId>,
    needle: String,
}

impl ContainsFilter {
    /// Matches lines where `column` of a row at `path` contains `text`.
    pub fn new(path: Path, column: ColumnId, text: &str) -> Self {
        Self {
            path,
            column: Some(column),
            needle: text.to_lowercase(),
        }
    }

    /// Matches lines where any column of a row at `path` contains `text`.
    pub fn any_column(path: Path, text: &str) -> Self {
        Self {
            path,
            column: None,
            needle: text.to_lowercase(),
        }
    }

    fn contains(&self, value: &vista_core::Value) -> bool {
        !value.is_null() && value.to_string().to_lowercase().contains(&self.needle)
    }
}

impl Filter for ContainsFilter {
    fn matches(&self, line: &Line) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        line.follow_path_all(&self.path)
            .into_iter()
            .filter_map(|node| node.row())
            .any(|row| match self.column {
                Some(column) => row.get(column).is_some_and(|v| self.contains(v)),
                None => row.values().iter().any(|v| self.contains(v)),
            })
    }
}

/// Conjunction of filters, empty matches everything.
#[derive(Clone, Default)]
pub struct AllOf {
    filters: Vec<Arc<dyn Filter>>,
}

impl AllOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Filter for AllOf {
    fn matches(&self, line: &Line) -> bool {
        self.filters.iter().all(|f| f.matches(line))
    }
}
