//! Units of work of the search worker.

use crate::change::RowChange;
use crate::filter::FilterSpec;
use crate::state::SearchState;
use core::fmt;
use vista_core::{ColumnId, RowId};
use vista_materialize::Line;

/// A read or write of the worker-owned state, with its reply channel
/// captured inside.
pub(crate) type Query = Box<dyn FnOnce(&mut SearchState) + Send>;

/// A task of the pending queue.
pub(crate) enum Task {
    /// Install a new list of lines.
    ReplaceList(Vec<Line>),
    /// Install a new filter.
    SetFilter(FilterSpec),
    /// Evaluate the filter against every line.
    FullFilterPass,
    /// Re-resolve the lines reaching a changed row.
    RowChanged(RowChange),
    /// Replace or remove one line.
    LineChanged {
        id: RowId,
        line: Option<Line>,
        columns: Vec<ColumnId>,
    },
    /// Synchronous caller work.
    Query(Query),
}

impl Task {
    /// Whether a later `ReplaceList` or `SetFilter` makes this task obsolete.
    #[inline]
    pub(crate) fn is_cancellable(&self) -> bool {
        matches!(self, Task::FullFilterPass)
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Task::ReplaceList(_) => "replace_list",
            Task::SetFilter(_) => "set_filter",
            Task::FullFilterPass => "full_filter_pass",
            Task::RowChanged(_) => "row_changed",
            Task::LineChanged { .. } => "line_changed",
            Task::Query(_) => "query",
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::ReplaceList(lines) => write!(f, "ReplaceList({} lines)", lines.len()),
            Task::SetFilter(spec) => write!(f, "SetFilter(some: {})", spec.is_some()),
            Task::FullFilterPass => f.write_str("FullFilterPass"),
            Task::RowChanged(change) => write!(f, "RowChanged({})", change),
            Task::LineChanged { id, line, columns } => write!(
                f,
                "LineChanged({}, removed: {}, {:?})",
                id,
                line.is_none(),
                columns
            ),
            Task::Query(_) => f.write_str("Query"),
        }
    }
}
