//! Shared schema and rows for unit tests.

use std::sync::Arc;
use vista_core::schema::{SchemaBuilder, TableBuilder};
use vista_core::{DataType, Row, RowId, TableId, Value};
use vista_graph::{DatabaseGraph, Path};
use vista_materialize::{Materializer, MemoryRowSource, PrototypeOptions};

pub(crate) const PAYS: TableId = 0;
pub(crate) const CLIENT: TableId = 1;
pub(crate) const SITE: TableId = 2;

/// PAYS <- CLIENT (ID_PAYS, self ID_CLIENT_PARENT) <- SITE (ID_CLIENT).
pub(crate) fn sample_graph() -> DatabaseGraph {
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
                .unwrap()
                .add_foreign_key("ID_CLIENT_PARENT", "CLIENT")
                .unwrap(),
        )
        .unwrap()
        .add_table(
            TableBuilder::new("SITE")
                .unwrap()
                .add_field("DESIGNATION", DataType::String)
                .unwrap()
                .add_foreign_key("ID_CLIENT", "CLIENT")
                .unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();
    DatabaseGraph::new(schema)
}

fn key(id: Option<RowId>) -> Value {
    id.map(Value::Int64).unwrap_or(Value::Null)
}

pub(crate) fn client(id: RowId, name: &str, pays: Option<RowId>, parent: Option<RowId>) -> Row {
    Row::new(CLIENT, id, vec![Value::from(name), key(pays), key(parent)])
}

/// PAYS 7 France, 8 Italia; CLIENT 1 Alice (7), 2 Bob (8, parent 1),
/// 3 Carol (dangling pays 99, parent 2); SITE 10 (client 1).
pub(crate) fn sample_source() -> MemoryRowSource {
    let source = MemoryRowSource::new();
    source.put(Row::new(PAYS, 7, vec![Value::from("France")]));
    source.put(Row::new(PAYS, 8, vec![Value::from("Italia")]));
    source.put(client(1, "Alice", Some(7), None));
    source.put(client(2, "Bob", Some(8), Some(1)));
    source.put(client(3, "Carol", Some(99), Some(2)));
    source.put(Row::new(SITE, 10, vec![Value::from("Siège"), Value::Int64(1)]));
    source
}

/// A foreign-only materializer of CLIENT lines over `sample_source()`.
pub(crate) fn materializer() -> (Materializer, Arc<MemoryRowSource>) {
    let source = Arc::new(sample_source());
    let m = Materializer::build(
        &sample_graph(),
        CLIENT,
        PrototypeOptions::default(),
        source.clone(),
    )
    .unwrap();
    (m, source)
}

/// CLIENT -> PAYS.
pub(crate) fn pays_path(m: &Materializer) -> Path {
    m.prototype()
        .paths_to(PAYS)
        .iter()
        .find(|p| p.len() == 1)
        .cloned()
        .unwrap()
}
