//! End-to-end scenarios of the search queue.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vista_core::schema::{SchemaBuilder, TableBuilder};
use vista_core::{DataType, Error, Row, RowId, TableId, Value};
use vista_graph::{DatabaseGraph, Path};
use vista_materialize::{Line, MemoryRowSource};
use vista_search::{ContainsFilter, ListChange, RowChange, SearchQueue, SearchQueueConfig};

const PAYS: TableId = 0;
const CLIENT: TableId = 1;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn graph() -> DatabaseGraph {
    let schema = SchemaBuilder::new()
        .add_table(
            TableBuilder::new("PAYS")
                .unwrap()
                .add_field("NOM", DataType::String)
                .unwrap(),
        )
        .unwrap()
        .add_table(
            TableBuilder::new("CLIENT")
                .unwrap()
                .add_field("NOM", DataType::String)
                .unwrap()
                .add_foreign_key("ID_PAYS", "PAYS")
                .unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();
    DatabaseGraph::new(schema)
}

/// Clients 1, 2, 3 in pays 8, 7, 9.
fn setup() -> (SearchQueue, Arc<MemoryRowSource>, Vec<Line>) {
    init_tracing();
    let source = Arc::new(MemoryRowSource::new());
    for (id, name) in [(7, "France"), (8, "Italia"), (9, "España")] {
        source.put(Row::new(PAYS, id, vec![Value::from(name)]));
    }
    for (id, pays) in [(1, 8), (2, 7), (3, 9)] {
        source.put(Row::new(
            CLIENT,
            id,
            vec![Value::from(format!("client {}", id)), Value::Int64(pays)],
        ));
    }
    let queue = SearchQueue::new(
        SearchQueueConfig::new("clients"),
        &graph(),
        CLIENT,
        source.clone(),
    )
    .unwrap();
    let lines = (1..=3).filter_map(|id| queue.materializer().load(id)).collect();
    (queue, source, lines)
}

fn pays_path(queue: &SearchQueue) -> Path {
    queue.prototype().paths_to(PAYS)[0].clone()
}

fn ids(lines: &[Line]) -> Vec<RowId> {
    lines.iter().map(Line::id).collect()
}

fn record(queue: &SearchQueue) -> Arc<Mutex<Vec<ListChange>>> {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    queue.subscribe(move |change| sink.lock().push(change.clone()));
    changes
}

#[test]
fn empty_list_with_filter_has_no_line() {
    let (queue, _, _) = setup();
    queue.replace_list(Vec::new()).unwrap();
    queue
        .set_filter(Some(Arc::new(ContainsFilter::new(Path::new(CLIENT), 0, "client"))))
        .unwrap();
    assert!(queue.visible_lines().unwrap().is_empty());
    assert_eq!(queue.current_size(), 0);
}

#[test]
fn affected_lines_reports_only_the_hit() {
    let (queue, _, lines) = setup();
    queue.replace_list(lines).unwrap();
    let path = pays_path(&queue);

    let affected = queue.affected_lines(PAYS, 7).unwrap();
    assert_eq!(affected.len(), 1);
    assert_eq!(affected.get(&2), Some(&vec![path.clone()]));

    let by_path = queue.affected_paths(PAYS, 7).unwrap();
    assert_eq!(by_path.len(), 1);
    assert_eq!(by_path.get(&path), Some(&vec![2]));

    assert!(queue.affected_lines(PAYS, 42).unwrap().is_empty());
    assert_eq!(queue.current_size(), 3);
}

#[test]
fn invalid_id_is_rejected() {
    let (queue, _, lines) = setup();
    queue.replace_list(lines).unwrap();
    assert_eq!(
        queue.affected_lines(PAYS, -1),
        Err(Error::InvalidRowId { id: -1 })
    );
    assert!(matches!(
        queue.affected_paths(CLIENT, -1),
        Err(Error::InvalidRowId { id: -1 })
    ));
}

#[test]
fn row_change_then_filter_runs_one_consistent_pass() {
    let (queue, source, lines) = setup();
    queue.replace_list(lines).unwrap();
    queue.visible_lines().unwrap();
    let changes = record(&queue);

    source.update_value(PAYS, 7, 0, Value::from("Suisse"));
    queue.row_changed(RowChange::new(PAYS, 7, [0])).unwrap();
    queue
        .set_filter(Some(Arc::new(ContainsFilter::any_column(
            pays_path(&queue),
            "suisse",
        ))))
        .unwrap();
    let visible = queue.visible_lines().unwrap();
    assert_eq!(ids(&visible), vec![2]);

    let changes = changes.lock();
    assert_eq!(changes.len(), 2);
    assert!(!changes[0].full);
    assert_eq!(changes[0].modified, vec![2]);
    assert!(changes[1].full);
    assert_eq!(changes[1].visible, vec![2]);
    assert_eq!(changes[1].removed, vec![1, 3]);
    assert_eq!(changes.iter().filter(|c| c.full).count(), 1);
}

#[test]
fn row_change_is_idempotent() {
    let (queue, source, lines) = setup();
    queue.replace_list(lines).unwrap();
    source.update_value(PAYS, 7, 0, Value::from("Belgique"));

    queue.row_changed(RowChange::new(PAYS, 7, [0])).unwrap();
    let once = (queue.visible_lines().unwrap(), queue.line(2).unwrap());
    queue.row_changed(RowChange::new(PAYS, 7, [0])).unwrap();
    let twice = (queue.visible_lines().unwrap(), queue.line(2).unwrap());

    assert_eq!(once, twice);
    let line = twice.1.unwrap();
    let pays = line.follow_path(&pays_path(&queue)).unwrap();
    assert_eq!(pays.row().unwrap().get(0), Some(&Value::from("Belgique")));
}

#[test]
fn line_changes_from_the_lines_source() {
    let (queue, source, lines) = setup();
    queue.replace_list(lines).unwrap();

    source.put(Row::new(CLIENT, 4, vec![Value::from("client 4"), Value::Int64(8)]));
    let new_line = queue.materializer().load(4);
    queue.line_changed(4, new_line, []).unwrap();
    queue.line_changed(1, None, []).unwrap();

    assert_eq!(ids(&queue.visible_lines().unwrap()), vec![2, 3, 4]);
    assert_eq!(queue.current_size(), 3);
}

#[test]
fn shut_down_queue_refuses_tasks() {
    let (queue, _, lines) = setup();
    queue.replace_list(lines).unwrap();
    queue.shutdown();
    assert!(queue.is_closed());
    assert!(matches!(
        queue.row_changed(RowChange::row(PAYS, 7)),
        Err(Error::QueueClosed { .. })
    ));
    assert!(matches!(
        queue.affected_lines(PAYS, 7),
        Err(Error::QueueClosed { .. })
    ));
    // idempotent, and again on drop
    queue.shutdown();
}
