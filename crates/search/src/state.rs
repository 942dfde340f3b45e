//! The list, filter and visibility owned by the search worker.

use crate::change::RowChange;
use crate::filter::{self, FilterSpec};
use crate::list_change::ListChange;
use crate::task::Task;
use hashbrown::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vista_core::{validate_row_id, ColumnId, Result, RowId, TableId};
use vista_graph::Path;
use vista_materialize::{Line, Materializer};

/// State of a search queue. Only the worker thread ever touches it.
pub(crate) struct SearchState {
    materializer: Materializer,
    lines: Vec<Line>,
    /// Line id -> position in `lines`
    positions: HashMap<RowId, usize>,
    /// Ids of the lines last published as visible
    shown: HashSet<RowId>,
    filter: FilterSpec,
    size: Arc<AtomicUsize>,
}

impl SearchState {
    pub(crate) fn new(materializer: Materializer, size: Arc<AtomicUsize>) -> Self {
        Self {
            materializer,
            lines: Vec::new(),
            positions: HashMap::new(),
            shown: HashSet::new(),
            filter: None,
            size,
        }
    }

    /// Applies `task`, returning what subscribers should see.
    pub(crate) fn run(&mut self, task: Task) -> Option<ListChange> {
        match task {
            Task::ReplaceList(lines) => {
                self.replace_list(lines);
                None
            }
            Task::SetFilter(spec) => {
                self.filter = spec;
                None
            }
            Task::FullFilterPass => Some(self.full_pass()),
            Task::RowChanged(change) => self.row_changed(&change),
            Task::LineChanged { id, line, columns } => self.line_changed(id, line, &columns),
            Task::Query(query) => {
                query(self);
                None
            }
        }
    }

    pub(crate) fn materializer(&self) -> &Materializer {
        &self.materializer
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn line(&self, id: RowId) -> Option<&Line> {
        self.positions.get(&id).map(|&i| &self.lines[i])
    }

    pub(crate) fn visible_lines(&self) -> Vec<Line> {
        self.lines
            .iter()
            .filter(|l| self.shown.contains(&l.id()))
            .cloned()
            .collect()
    }

    /// Every `(path, line id)` where the row `id` of `table` is reached,
    /// paths in prototype order, lines in list order.
    pub(crate) fn affected(&self, table: TableId, id: RowId) -> Result<Vec<(Path, RowId)>> {
        validate_row_id(id)?;
        let mut hits = Vec::new();
        if self.lines.is_empty() {
            return Ok(hits);
        }
        for path in self.materializer.prototype().paths_to(table) {
            for line in &self.lines {
                if line.hits(path, id) {
                    hits.push((path.clone(), line.id()));
                }
            }
        }
        Ok(hits)
    }

    fn replace_list(&mut self, lines: Vec<Line>) {
        self.lines.clear();
        self.positions.clear();
        for line in lines {
            let id = line.id();
            if self.positions.contains_key(&id) {
                tracing::warn!(line = id, "duplicate line ignored");
                continue;
            }
            self.positions.insert(id, self.lines.len());
            self.lines.push(line);
        }
        self.publish_size();
        tracing::debug!(lines = self.lines.len(), "replaced list");
    }

    fn full_pass(&mut self) -> ListChange {
        let mut change = ListChange::full_pass();
        let mut shown = HashSet::with_capacity(self.shown.len());
        for line in &self.lines {
            let id = line.id();
            let now = filter::matches(&self.filter, line);
            change.record(id, self.shown.contains(&id), now);
            if now {
                shown.insert(id);
                change.visible.push(id);
            }
        }

        // shown lines that are not in the list anymore
        let mut gone: Vec<RowId> = self
            .shown
            .iter()
            .filter(|id| !self.positions.contains_key(*id))
            .copied()
            .collect();
        gone.sort_unstable();
        change.removed.extend(gone);

        self.shown = shown;
        tracing::debug!(
            lines = self.lines.len(),
            visible = change.visible.len(),
            "full filter pass"
        );
        change
    }

    fn row_changed(&mut self, change: &RowChange) -> Option<ListChange> {
        if self.lines.is_empty() {
            return None;
        }
        if validate_row_id(change.id).is_err() {
            tracing::warn!(table = change.table, id = change.id, "row change with invalid id ignored");
            return None;
        }

        let paths = self.materializer.prototype().paths_to(change.table);
        let mut touched = Vec::new();
        for (index, line) in self.lines.iter_mut().enumerate() {
            let id = line.id();
            let mut refreshed = 0;
            for path in paths {
                refreshed += self.materializer.refresh(line, path, change.id);
            }
            if refreshed > 0 {
                touched.push((index, id));
            }
        }
        tracing::trace!(change = %change, lines = touched.len(), "row changed");

        // a filter panicking below leaves `shown` behind the refreshed
        // lines until the next full pass
        let mut list_change = ListChange::new();
        let mut deleted = Vec::new();
        for (index, id) in touched {
            if self.lines[index].row().is_none() {
                deleted.push((index, id));
            } else {
                self.refilter(index, &mut list_change);
            }
        }
        self.remove_lines(&deleted, &mut list_change);
        self.finish(list_change)
    }

    fn line_changed(
        &mut self,
        id: RowId,
        line: Option<Line>,
        columns: &[ColumnId],
    ) -> Option<ListChange> {
        if validate_row_id(id).is_err() {
            tracing::warn!(id, "line change with invalid id ignored");
            return None;
        }
        let mut list_change = ListChange::new();
        match line {
            Some(line) if line.id() != id => {
                tracing::warn!(id, actual = line.id(), "line does not match its id, ignored");
                return None;
            }
            Some(line) => {
                let index = match self.positions.get(&id) {
                    Some(&index) => {
                        self.lines[index] = line;
                        index
                    }
                    None => {
                        self.positions.insert(id, self.lines.len());
                        self.lines.push(line);
                        self.publish_size();
                        self.lines.len() - 1
                    }
                };
                self.refilter(index, &mut list_change);
            }
            None => {
                if let Some(&index) = self.positions.get(&id) {
                    self.remove_lines(&[(index, id)], &mut list_change);
                }
            }
        }
        tracing::trace!(id, ?columns, "line changed");
        self.finish(list_change)
    }

    fn refilter(&mut self, index: usize, change: &mut ListChange) {
        let line = &self.lines[index];
        let id = line.id();
        let now = filter::matches(&self.filter, line);
        change.record(id, self.shown.contains(&id), now);
        if now {
            self.shown.insert(id);
        } else {
            self.shown.remove(&id);
        }
    }

    /// Removes the lines at the given positions, ascending.
    fn remove_lines(&mut self, lines: &[(usize, RowId)], change: &mut ListChange) {
        if lines.is_empty() {
            return;
        }
        for &(index, id) in lines.iter().rev() {
            self.lines.remove(index);
            if self.shown.remove(&id) {
                change.removed.push(id);
            }
        }
        self.positions.clear();
        for (index, line) in self.lines.iter().enumerate() {
            self.positions.insert(line.id(), index);
        }
        self.publish_size();
    }

    fn finish(&self, mut change: ListChange) -> Option<ListChange> {
        if change.is_empty() {
            return None;
        }
        change.visible = self
            .lines
            .iter()
            .map(Line::id)
            .filter(|id| self.shown.contains(id))
            .collect();
        Some(change)
    }

    fn publish_size(&self) {
        self.size.store(self.lines.len(), Ordering::Release);
    }
}
