//! Schema graph: every foreign key link of a schema.

use crate::link::Link;
use hashbrown::HashMap;
use std::sync::Arc;
use vista_core::schema::Schema;
use vista_core::{FieldId, TableId};

/// The graph whose vertices are tables and whose edges are foreign keys.
///
/// Links are indexed by field, by table (a table sees both the links it
/// declares and the links referencing it) and by unordered table pair.
/// Every list is in schema declaration order.
#[derive(Clone, Debug)]
pub struct DatabaseGraph {
    schema: Arc<Schema>,
    /// Field -> its link
    foreign: HashMap<FieldId, Link>,
    /// Table -> links touching it
    by_table: HashMap<TableId, Vec<Link>>,
    /// (min table, max table) -> links between them
    by_pair: HashMap<(TableId, TableId), Vec<Link>>,
}

impl DatabaseGraph {
    /// Builds the graph of a schema.
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        let schema = schema.into();
        let mut foreign = HashMap::new();
        let mut by_table: HashMap<TableId, Vec<Link>> = HashMap::new();
        let mut by_pair: HashMap<(TableId, TableId), Vec<Link>> = HashMap::new();

        for table in schema.tables() {
            for field in table.foreign_keys() {
                let Some(target) = field.references() else {
                    continue;
                };
                let link = Link::new(field.id(), target);
                foreign.insert(field.id(), link);

                by_table.entry(link.source()).or_default().push(link);
                if !link.is_self_reference() {
                    by_table.entry(link.target()).or_default().push(link);
                }
                by_pair.entry(pair(link.source(), link.target())).or_default().push(link);
            }
        }

        // links referencing a table were pushed while walking later tables
        for links in by_table.values_mut() {
            links.sort();
        }

        Self {
            schema,
            foreign,
            by_table,
            by_pair,
        }
    }

    /// Returns the schema this graph was built from.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns a shared handle on the schema.
    #[inline]
    pub fn schema_arc(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// Returns the link of a foreign key field, `None` if the field is not
    /// a foreign key.
    pub fn foreign_link(&self, field: FieldId) -> Option<&Link> {
        self.foreign.get(&field)
    }

    /// Returns every link touching `table`.
    pub fn links(&self, table: TableId) -> &[Link] {
        self.by_table
            .get(&table)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the links connecting `a` and `b`, in either direction.
    pub fn links_between(&self, a: TableId, b: TableId) -> &[Link] {
        self.by_pair
            .get(&pair(a, b))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the fields connecting `a` and `b`.
    pub fn fields_between(&self, a: TableId, b: TableId) -> Vec<FieldId> {
        self.links_between(a, b).iter().map(Link::field).collect()
    }

    /// Returns the number of links.
    pub fn len(&self) -> usize {
        self.foreign.len()
    }

    /// Returns true if the schema has no foreign key.
    pub fn is_empty(&self) -> bool {
        self.foreign.is_empty()
    }

    pub(crate) fn table_name(&self, table: TableId) -> String {
        self.schema.table_name(table)
    }

    pub(crate) fn field_name(&self, field: FieldId) -> String {
        self.schema.qualified_name(field)
    }
}

fn pair(a: TableId, b: TableId) -> (TableId, TableId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use vista_core::schema::{SchemaBuilder, TableBuilder};
    use vista_core::DataType;

    /// PAYS(0) <- CLIENT(1) (ID_PAYS, self ID_CLIENT_PARENT);
    /// CONTACT(2) <- SITE(3) (ID_CONTACT_CHEF, ID_CONTACT_BUREAU, ID_CLIENT).
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

    #[test]
    fn test_graph_links() {
        let graph = sample_graph();
        assert_eq!(graph.len(), 5);

        // CLIENT: ID_PAYS, ID_CLIENT_PARENT (once), SITE.ID_CLIENT
        assert_eq!(graph.links(1).len(), 3);
        assert_eq!(graph.links(0).len(), 1);
        assert_eq!(graph.links(2).len(), 2);
        assert!(graph.links(42).is_empty());
    }

    #[test]
    fn test_graph_fields_between() {
        let graph = sample_graph();
        let fields = graph.fields_between(3, 2);
        assert_eq!(fields, vec![FieldId::new(3, 1), FieldId::new(3, 2)]);
        assert_eq!(graph.fields_between(2, 3), fields);
        assert_eq!(graph.fields_between(1, 1), vec![FieldId::new(1, 2)]);
        assert!(graph.fields_between(0, 2).is_empty());
    }

    #[test]
    fn test_graph_foreign_link() {
        let graph = sample_graph();
        let link = graph.foreign_link(FieldId::new(1, 1)).unwrap();
        assert_eq!(link.target(), 0);
        assert!(graph.foreign_link(FieldId::new(1, 0)).is_none());
        assert_eq!(graph.field_name(FieldId::new(1, 1)), "CLIENT.ID_PAYS");
    }
}
