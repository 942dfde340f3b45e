//! Shared schema and rows for unit tests.

use crate::row_source::MemoryRowSource;
use vista_core::schema::{SchemaBuilder, TableBuilder};
use vista_core::{DataType, FieldId, Row, RowId, TableId, Value};
use vista_graph::DatabaseGraph;

pub(crate) const PAYS: TableId = 0;
pub(crate) const CLIENT: TableId = 1;
pub(crate) const CONTACT: TableId = 2;
pub(crate) const SITE: TableId = 3;

pub(crate) const CLIENT_PAYS: FieldId = FieldId::new(CLIENT, 1);
pub(crate) const CLIENT_PARENT: FieldId = FieldId::new(CLIENT, 2);
pub(crate) const SITE_CLIENT: FieldId = FieldId::new(SITE, 3);

/// PAYS <- CLIENT (ID_PAYS, self ID_CLIENT_PARENT);
/// CONTACT <- SITE (ID_CONTACT_CHEF, ID_CONTACT_BUREAU) and SITE -> CLIENT.
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
            TableBuilder::new("CONTACT")
                .unwrap()
                .add_field("NOM", DataType::String)
                .unwrap(),
        )
        .unwrap()
        .add_table(
            TableBuilder::new("SITE")
                .unwrap()
                .add_field("DESIGNATION", DataType::String)
                .unwrap()
                .add_foreign_key("ID_CONTACT_CHEF", "CONTACT")
                .unwrap()
                .add_foreign_key("ID_CONTACT_BUREAU", "CONTACT")
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

pub(crate) fn pays(id: RowId, name: &str) -> Row {
    Row::new(PAYS, id, vec![Value::from(name)])
}

pub(crate) fn client(id: RowId, name: &str, pays: Option<RowId>, parent: Option<RowId>) -> Row {
    Row::new(CLIENT, id, vec![Value::from(name), key(pays), key(parent)])
}

pub(crate) fn contact(id: RowId, name: &str) -> Row {
    Row::new(CONTACT, id, vec![Value::from(name)])
}

pub(crate) fn site(id: RowId, name: &str, chef: Option<RowId>, client: Option<RowId>) -> Row {
    Row::new(
        SITE,
        id,
        vec![Value::from(name), key(chef), Value::Null, key(client)],
    )
}

/// PAYS 7 France, 8 Italia; CLIENT 1 Alice (7), 2 Bob (8, parent 1),
/// 3 Carol (dangling pays 99, parent 2); CONTACT 20 Dupont;
/// SITE 10 Siège (chef 20, client 1).
pub(crate) fn sample_source() -> MemoryRowSource {
    let source = MemoryRowSource::new();
    source.put(pays(7, "France"));
    source.put(pays(8, "Italia"));
    source.put(client(1, "Alice", Some(7), None));
    source.put(client(2, "Bob", Some(8), Some(1)));
    source.put(client(3, "Carol", Some(99), Some(2)));
    source.put(contact(20, "Dupont"));
    source.put(site(10, "Siège", Some(20), Some(1)));
    source
}
