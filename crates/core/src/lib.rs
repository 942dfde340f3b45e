//! Vista Core - Core types and schema definitions for Vista materialized views.
//!
//! This crate provides the foundational types shared by every Vista layer:
//!
//! - `DataType`: Supported data types (Boolean, Int32, Int64, Float64, String, DateTime, Bytes)
//! - `Value`: Runtime values carried by rows
//! - `Row`: An identified tuple of one table, with the id sentinels
//! - `schema`: Schema definitions (Field, Table, Schema) including foreign keys
//! - `Error`: Error types shared by the whole workspace
//!
//! # Example
//!
//! ```rust
//! use vista_core::{DataType, Row, Value};
//! use vista_core::schema::{SchemaBuilder, TableBuilder};
//!
//! let schema = SchemaBuilder::new()
//!     .add_table(
//!         TableBuilder::new("PAYS")
//!             .unwrap()
//!             .add_field("NOM", DataType::String)
//!             .unwrap(),
//!     )
//!     .unwrap()
//!     .add_table(
//!         TableBuilder::new("CLIENT")
//!             .unwrap()
//!             .add_field("NOM", DataType::String)
//!             .unwrap()
//!             .add_foreign_key("ID_PAYS", "PAYS")
//!             .unwrap(),
//!     )
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let client = schema.table_by_name("CLIENT").unwrap();
//! let row = Row::new(client.id(), 1, vec![Value::from("Alice"), Value::Int64(7)]);
//!
//! assert_eq!(row.id(), 1);
//! assert_eq!(row.foreign_id(1), Some(7));
//! ```

mod error;
mod row;
pub mod schema;
mod types;
mod value;

pub use error::{Error, Result};
pub use row::{validate_row_id, Row, RowId, MIN_VALID_ID, UNDEFINED_ID};
pub use schema::{ColumnId, FieldId, TableId};
pub use types::DataType;
pub use value::Value;
