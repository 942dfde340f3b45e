//! Schema snapshot: the set of tables a view is built against.

use super::field::Field;
use super::table::{Table, TableBuilder};
use super::{FieldId, TableId};
use crate::error::{Error, Result};
use hashbrown::HashMap;

/// An immutable snapshot of tables and their fields.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    tables: Vec<Table>,
    by_name: HashMap<String, TableId>,
}

impl Schema {
    /// Returns all tables, in declaration order.
    #[inline]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Returns the number of tables.
    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the schema declares no table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Gets a table by identifier.
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id as usize)
    }

    /// Gets a table by name.
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.by_name.get(name).and_then(|id| self.table(*id))
    }

    /// Gets a table identifier by name.
    pub fn table_id(&self, name: &str) -> Result<TableId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::TableNotFound {
                name: name.to_string(),
            })
    }

    /// Gets a field by identifier.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.table(id.table).and_then(|t| t.field_at(id.column))
    }

    /// Resolves `TABLE.FIELD` names to a field identifier.
    pub fn field_id(&self, table: &str, field: &str) -> Result<FieldId> {
        let table = self.table_by_name(table).ok_or_else(|| Error::TableNotFound {
            name: table.to_string(),
        })?;
        table.field_id(field)
    }

    /// Returns the name of a table, or its numeric id if unknown.
    pub fn table_name(&self, id: TableId) -> String {
        self.table(id)
            .map(|t| t.name().to_string())
            .unwrap_or_else(|| format!("#{}", id))
    }

    /// Returns `TABLE.FIELD` for a field identifier.
    pub fn qualified_name(&self, id: FieldId) -> String {
        match self.field(id) {
            Some(field) => format!("{}.{}", self.table_name(id.table), field.name()),
            None => format!("{}.#{}", self.table_name(id.table), id.column),
        }
    }
}

/// Builder assigning table identifiers and resolving foreign keys.
#[derive(Default)]
pub struct SchemaBuilder {
    tables: Vec<TableBuilder>,
}

impl SchemaBuilder {
    /// Creates an empty schema builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table. Tables get identifiers in the order they are added.
    pub fn add_table(mut self, table: TableBuilder) -> Result<Self> {
        if self.tables.iter().any(|t| t.name() == table.name()) {
            return Err(Error::InvalidSchema {
                message: format!("Table already exists: {}", table.name()),
            });
        }
        self.tables.push(table);
        Ok(self)
    }

    /// Builds the schema.
    pub fn build(self) -> Result<Schema> {
        let by_name: HashMap<String, TableId> = self
            .tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name().to_string(), i as TableId))
            .collect();

        let tables = self
            .tables
            .into_iter()
            .enumerate()
            .map(|(i, t)| t.build(i as TableId, |name| by_name.get(name).copied()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Schema { tables, by_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn sample() -> Schema {
        SchemaBuilder::new()
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
            .build()
            .unwrap()
    }

    #[test]
    fn test_schema_ids_in_declaration_order() {
        let schema = sample();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.table_id("PAYS"), Ok(0));
        assert_eq!(schema.table_id("CLIENT"), Ok(1));
    }

    #[test]
    fn test_schema_resolves_references() {
        let schema = sample();
        let client = schema.table_by_name("CLIENT").unwrap();
        assert_eq!(client.get_field("ID_PAYS").unwrap().references(), Some(0));
        assert_eq!(
            client.get_field("ID_CLIENT_PARENT").unwrap().references(),
            Some(1)
        );
    }

    #[test]
    fn test_schema_field_lookup() {
        let schema = sample();
        let id = schema.field_id("CLIENT", "ID_PAYS").unwrap();
        assert_eq!(id, FieldId::new(1, 1));
        assert_eq!(schema.qualified_name(id), "CLIENT.ID_PAYS");
        assert!(schema.field_id("FACTURE", "NOM").is_err());
    }

    #[test]
    fn test_duplicate_table() {
        let result = SchemaBuilder::new()
            .add_table(TableBuilder::new("PAYS").unwrap())
            .unwrap()
            .add_table(TableBuilder::new("PAYS").unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_forward_reference_is_resolved() {
        let schema = SchemaBuilder::new()
            .add_table(
                TableBuilder::new("CLIENT")
                    .unwrap()
                    .add_foreign_key("ID_PAYS", "PAYS")
                    .unwrap(),
            )
            .unwrap()
            .add_table(TableBuilder::new("PAYS").unwrap())
            .unwrap()
            .build()
            .unwrap();
        let fk = schema.field_id("CLIENT", "ID_PAYS").unwrap();
        assert_eq!(schema.field(fk).unwrap().references(), Some(1));
    }
}
