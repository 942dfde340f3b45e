//! The search queue: one worker applying tasks in submission order.
//!
//! Callers never touch the list of lines or the filter directly. Every
//! operation is a task pushed at the back of a FIFO consumed by a dedicated
//! thread:
//!
//! - `replace_list` and `set_filter` cancel the filter passes still pending
//!   and queue a new one after themselves
//! - `row_changed` and `line_changed` are applied incrementally and never
//!   cancelled
//! - `affected_lines`, `affected_paths`, `visible_lines` and `line` block
//!   the caller until their task ran, so they see exactly the tasks queued
//!   before them
//!
//! A panic inside a task is caught: a synchronous caller gets it back as
//! `Error::Execution`, an asynchronous one is logged. The worker keeps going
//! either way.

use crate::change::RowChange;
use crate::config::SearchQueueConfig;
use crate::feed::{ChangeFeed, ChangeListener, ListenerId};
use crate::filter::FilterSpec;
use crate::list_change::ListChange;
use crate::state::SearchState;
use crate::subscription::{SubscriptionId, SubscriptionManager};
use crate::task::Task;
use hashbrown::HashMap;
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::collections::{BTreeMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle, ThreadId};
use vista_core::{validate_row_id, ColumnId, Error, Result, RowId, TableId};
use vista_graph::{DatabaseGraph, Path};
use vista_materialize::{Line, Materializer, Prototype, RowSource};

/// Line id -> the paths reaching the changed row, in prototype order.
pub type AffectedLines = BTreeMap<RowId, Vec<Path>>;

/// Path -> the ids of the lines it reaches the changed row on, in list order.
pub type AffectedPaths = HashMap<Path, Vec<RowId>>;

struct Pending {
    tasks: VecDeque<Task>,
    closed: bool,
}

/// The part of a queue shared with its worker and its change feed.
struct Shared {
    name: String,
    pending: Mutex<Pending>,
    ready: Condvar,
    size: Arc<AtomicUsize>,
    subscriptions: Mutex<SubscriptionManager>,
    /// Tables reached by the prototype, sorted
    tables: Vec<TableId>,
}

impl Shared {
    fn closed_error(&self) -> Error {
        Error::QueueClosed {
            name: self.name.clone(),
        }
    }

    fn submit(&self, task: Task) -> Result<()> {
        let mut pending = self.pending.lock();
        if pending.closed {
            return Err(self.closed_error());
        }
        tracing::trace!(queue = %self.name, task = ?task, "queued");
        pending.tasks.push_back(task);
        drop(pending);
        self.ready.notify_one();
        Ok(())
    }

    /// Queues a task that invalidates every pending filter pass, followed by
    /// a fresh pass.
    fn submit_full(&self, task: Task) -> Result<()> {
        let mut pending = self.pending.lock();
        if pending.closed {
            return Err(self.closed_error());
        }
        let before = pending.tasks.len();
        pending.tasks.retain(|t| !t.is_cancellable());
        let cancelled = before - pending.tasks.len();
        if cancelled > 0 {
            tracing::debug!(queue = %self.name, cancelled, "cancelled pending filter passes");
        }
        tracing::trace!(queue = %self.name, task = ?task, "queued");
        pending.tasks.push_back(task);
        pending.tasks.push_back(Task::FullFilterPass);
        drop(pending);
        self.ready.notify_one();
        Ok(())
    }

    /// Blocks until a task is available, `None` once closed.
    fn next(&self) -> Option<Task> {
        let mut pending = self.pending.lock();
        loop {
            if let Some(task) = pending.tasks.pop_front() {
                return Some(task);
            }
            if pending.closed {
                return None;
            }
            self.ready.wait(&mut pending);
        }
    }

    /// Stops accepting tasks and drops the pending ones, returning false if
    /// already closed.
    fn close(&self) -> bool {
        let dropped: Vec<Task> = {
            let mut pending = self.pending.lock();
            if pending.closed {
                return false;
            }
            pending.closed = true;
            pending.tasks.drain(..).collect()
        };
        // dropping a query drops its reply sender: the caller gets Interrupted
        let count = dropped.len();
        drop(dropped);
        self.ready.notify_all();
        tracing::debug!(queue = %self.name, dropped = count, "search queue closed");
        true
    }

    fn is_closed(&self) -> bool {
        self.pending.lock().closed
    }

    fn pending_len(&self) -> usize {
        self.pending.lock().tasks.len()
    }

    fn notify(&self, change: &ListChange) {
        tracing::trace!(
            queue = %self.name,
            added = change.added.len(),
            removed = change.removed.len(),
            modified = change.modified.len(),
            full = change.full,
            "publishing list change"
        );
        let callbacks = self.subscriptions.lock().snapshot();
        for callback in callbacks {
            callback(change);
        }
    }
}

impl ChangeListener for Shared {
    fn tables(&self) -> Vec<TableId> {
        self.tables.clone()
    }

    fn on_row_change(&self, change: &RowChange) {
        if let Err(err) = self.submit(Task::RowChanged(change.clone())) {
            tracing::debug!(queue = %self.name, %err, change = %change, "row change dropped");
        }
    }
}

fn run_worker(shared: Arc<Shared>, mut state: SearchState) {
    let _span = tracing::debug_span!("search_worker", queue = %shared.name).entered();
    tracing::debug!("search worker started");
    while let Some(task) = shared.next() {
        let kind = task.kind();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            if let Some(change) = state.run(task) {
                shared.notify(&change);
            }
        }));
        if let Err(payload) = outcome {
            tracing::error!(
                queue = %shared.name,
                task = kind,
                panic = %panic_message(&*payload),
                "task panicked"
            );
        }
    }
    tracing::debug!("search worker stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// An incrementally maintained, filtered list of lines.
///
/// The queue owns a single named worker thread. It is shut down explicitly
/// with `shutdown` or when dropped; pending synchronous callers then receive
/// `Error::Interrupted` and later calls fail with `Error::QueueClosed`.
pub struct SearchQueue {
    shared: Arc<Shared>,
    materializer: Materializer,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
    feed: Mutex<Option<(Arc<ChangeFeed>, ListenerId)>>,
}

impl SearchQueue {
    /// Creates a queue of lines rooted at `root` and starts its worker.
    pub fn new(
        config: SearchQueueConfig,
        graph: &DatabaseGraph,
        root: TableId,
        source: Arc<dyn RowSource>,
    ) -> Result<Self> {
        let materializer =
            Materializer::build(graph, root, config.prototype_options(), source)?;
        Self::with_materializer(config, materializer)
    }

    /// Creates a queue over an existing materializer and starts its worker.
    pub fn with_materializer(config: SearchQueueConfig, materializer: Materializer) -> Result<Self> {
        let mut tables: Vec<TableId> = materializer.prototype().tables().collect();
        tables.sort_unstable();

        let size = Arc::new(AtomicUsize::new(0));
        let shared = Arc::new(Shared {
            name: config.name().to_string(),
            pending: Mutex::new(Pending {
                tasks: VecDeque::new(),
                closed: false,
            }),
            ready: Condvar::new(),
            size: Arc::clone(&size),
            subscriptions: Mutex::new(SubscriptionManager::new()),
            tables,
        });

        let state = SearchState::new(materializer.clone(), size);
        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(config.name().to_string())
            .spawn(move || run_worker(worker_shared, state))
            .map_err(|err| Error::Execution {
                message: format!("cannot start worker {}: {}", config.name(), err),
            })?;

        tracing::debug!(
            queue = config.name(),
            root = materializer.prototype().root_table(),
            paths = materializer.prototype().paths().len(),
            "search queue started"
        );

        Ok(Self {
            shared,
            materializer,
            worker_id: handle.thread().id(),
            worker: Mutex::new(Some(handle)),
            feed: Mutex::new(None),
        })
    }

    /// The queue name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// The paths followed by every line.
    #[inline]
    pub fn prototype(&self) -> &Arc<Prototype> {
        self.materializer.prototype()
    }

    /// The materializer lines of this queue are built with.
    #[inline]
    pub fn materializer(&self) -> &Materializer {
        &self.materializer
    }

    /// Replaces every line, then filters them again.
    pub fn replace_list(&self, lines: Vec<Line>) -> Result<()> {
        self.shared.submit_full(Task::ReplaceList(lines))
    }

    /// Installs a new filter, then filters every line again.
    pub fn set_filter(&self, filter: FilterSpec) -> Result<()> {
        self.shared.submit_full(Task::SetFilter(filter))
    }

    /// Re-resolves the lines that reach the changed row and filters them
    /// again.
    pub fn row_changed(&self, change: RowChange) -> Result<()> {
        self.shared.submit(Task::RowChanged(change))
    }

    /// Replaces the line `id` with `line`, or removes it when `None`.
    pub fn line_changed(
        &self,
        id: RowId,
        line: Option<Line>,
        columns: impl IntoIterator<Item = ColumnId>,
    ) -> Result<()> {
        self.shared.submit(Task::LineChanged {
            id,
            line,
            columns: columns.into_iter().collect(),
        })
    }

    /// The lines reaching row `id` of `table`, each with the paths that
    /// reach it.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidRowId` before queueing anything if `id` is below
    /// the minimum valid id.
    pub fn affected_lines(&self, table: TableId, id: RowId) -> Result<AffectedLines> {
        validate_row_id(id)?;
        let hits = self.execute(move |state| state.affected(table, id))?;
        let mut lines = AffectedLines::new();
        for (path, line) in hits {
            lines.entry(line).or_default().push(path);
        }
        Ok(lines)
    }

    /// The paths reaching row `id` of `table`, each with the lines it is
    /// reached on.
    pub fn affected_paths(&self, table: TableId, id: RowId) -> Result<AffectedPaths> {
        validate_row_id(id)?;
        let hits = self.execute(move |state| state.affected(table, id))?;
        let mut paths = AffectedPaths::new();
        for (path, line) in hits {
            paths.entry(path).or_default().push(line);
        }
        Ok(paths)
    }

    /// A snapshot of the visible lines, in list order.
    pub fn visible_lines(&self) -> Result<Vec<Line>> {
        self.execute(|state| Ok(state.visible_lines()))
    }

    /// A snapshot of the line `id`, visible or not.
    pub fn line(&self, id: RowId) -> Result<Option<Line>> {
        self.execute(move |state| Ok(state.line(id).cloned()))
    }

    /// The number of lines, filtered or not.
    ///
    /// Best effort: tasks still pending are not accounted for.
    #[inline]
    pub fn current_size(&self) -> usize {
        self.shared.size.load(Ordering::Acquire)
    }

    /// The number of tasks waiting for the worker.
    pub fn pending_tasks(&self) -> usize {
        self.shared.pending_len()
    }

    /// Calls `callback` on the worker after every task that changed the
    /// visible list.
    ///
    /// The callback may subscribe or unsubscribe on this queue, itself
    /// included. Synchronous queries from it fail with `Execution`.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ListChange) + Send + Sync + 'static,
    {
        self.shared.subscriptions.lock().subscribe(Arc::new(callback))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.subscriptions.lock().unsubscribe(id)
    }

    /// Receives the row changes published on `feed` for the tables this
    /// queue's lines reach, replacing any previous feed.
    pub fn listen(&self, feed: &Arc<ChangeFeed>) -> ListenerId {
        let listener: Arc<dyn ChangeListener> = self.shared.clone();
        let id = feed.register(&listener);
        if let Some((old, old_id)) = self.feed.lock().replace((Arc::clone(feed), id)) {
            old.unregister(old_id);
        }
        id
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Stops the worker.
    ///
    /// Pending tasks are dropped, their synchronous callers receive
    /// `Error::Interrupted`. Waits for the running task unless called from
    /// the worker itself.
    pub fn shutdown(&self) {
        if let Some((feed, id)) = self.feed.lock().take() {
            feed.unregister(id);
        }
        self.shared.close();

        let Some(handle) = self.worker.lock().take() else {
            return;
        };
        if thread::current().id() == self.worker_id {
            return;
        }
        if handle.join().is_err() {
            tracing::error!(queue = %self.shared.name, "search worker panicked");
        }
    }

    /// Runs `f` on the worker and waits for its result.
    fn execute<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut SearchState) -> Result<R> + Send + 'static,
    {
        if thread::current().id() == self.worker_id {
            return Err(Error::Execution {
                message: format!("{}: synchronous call from its own worker", self.shared.name),
            });
        }
        let (tx, rx) = mpsc::sync_channel(1);
        self.shared.submit(Task::Query(Box::new(move |state: &mut SearchState| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| f(state))).unwrap_or_else(
                |payload| {
                    Err(Error::Execution {
                        message: panic_message(&*payload),
                    })
                },
            );
            let _ = tx.send(result);
        })))?;
        rx.recv().map_err(|_| Error::Interrupted)?
    }
}

impl Drop for SearchQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl core::fmt::Debug for SearchQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SearchQueue")
            .field("name", &self.shared.name)
            .field("size", &self.current_size())
            .field("closed", &self.is_closed())
            .finish()
    }
}
