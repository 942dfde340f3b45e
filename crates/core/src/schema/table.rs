//! Table definition for Vista schemas.

use super::field::Field;
use super::{ColumnId, FieldId, TableId};
use crate::error::{Error, Result};
use crate::types::DataType;

/// A table definition in the schema.
///
/// Every table has an implicit row id; `fields` lists the other columns, in
/// the order their values appear in a `Row`.
#[derive(Clone, Debug)]
pub struct Table {
    /// Table identifier, assigned by the schema.
    id: TableId,
    /// Table name.
    name: String,
    /// Field definitions.
    fields: Vec<Field>,
}

impl Table {
    /// Returns the table identifier.
    #[inline]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Returns the table name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields.
    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Gets a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Gets a field by index.
    pub fn field_at(&self, index: ColumnId) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Gets a field identifier by name.
    pub fn field_id(&self, name: &str) -> Result<FieldId> {
        self.get_field(name)
            .map(Field::id)
            .ok_or_else(|| Error::FieldNotFound {
                table: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// Returns the foreign keys declared by this table.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_foreign_key())
    }
}

/// Builder for creating table definitions.
///
/// Foreign keys name their referenced table; the reference is resolved when
/// the table is added to a schema.
pub struct TableBuilder {
    name: String,
    fields: Vec<Field>,
    foreign_keys: Vec<(ColumnId, String)>,
}

impl TableBuilder {
    /// Creates a new table builder.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_naming_rules(&name)?;
        Ok(Self {
            name,
            fields: Vec::new(),
            foreign_keys: Vec::new(),
        })
    }

    /// Returns the name of the table being built.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a field to the table.
    pub fn add_field(mut self, name: impl Into<String>, data_type: DataType) -> Result<Self> {
        let name = name.into();
        check_naming_rules(&name)?;
        if self.fields.iter().any(|f| f.name() == name) {
            return Err(Error::InvalidSchema {
                message: format!("Field already exists: {}.{}", self.name, name),
            });
        }
        self.fields.push(Field::new(name, data_type));
        Ok(self)
    }

    /// Adds a nullable foreign key field referencing `target`.
    ///
    /// `target` may be the table being built (self-reference).
    pub fn add_foreign_key(mut self, name: impl Into<String>, target: &str) -> Result<Self> {
        let name = name.into();
        check_naming_rules(&name)?;
        self = self.add_field(name, DataType::Int64)?;
        let index = self.fields.len() - 1;
        self.fields[index] = self.fields[index].clone().nullable(true);
        self.foreign_keys.push((index, target.to_string()));
        Ok(self)
    }

    /// Builds the table, resolving foreign key targets with `resolve`.
    pub(crate) fn build(
        self,
        id: TableId,
        resolve: impl Fn(&str) -> Option<TableId>,
    ) -> Result<Table> {
        let mut fields: Vec<Field> = self
            .fields
            .into_iter()
            .enumerate()
            .map(|(i, f)| f.with_position(id, i))
            .collect();

        for (index, target) in self.foreign_keys {
            let target_id = resolve(&target).ok_or(Error::TableNotFound { name: target })?;
            fields[index] = fields[index].clone().with_reference(target_id);
        }

        Ok(Table {
            id,
            name: self.name,
            fields,
        })
    }
}

/// Validates a name follows naming rules.
pub(crate) fn check_naming_rules(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => {
            return Err(Error::InvalidSchema {
                message: "Name cannot be empty".into(),
            })
        }
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(Error::InvalidSchema {
            message: format!("Name must start with letter or underscore: {}", name),
        });
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::InvalidSchema {
            message: format!("Name contains invalid characters: {}", name),
        });
    }
    Ok(())
}
