//! Error types for Vista.
//!
//! A single error enum is shared by every crate of the workspace so that a
//! caller of the search queue sees schema, path and worker failures through
//! one type.

use crate::row::RowId;
use thiserror::Error;

/// Result type alias for Vista operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for Vista operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid schema definition.
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    /// Table not found.
    #[error("table not found: {name}")]
    TableNotFound { name: String },

    /// Field not found in a table.
    #[error("field not found: {table}.{field}")]
    FieldNotFound { table: String, field: String },

    /// The field does not reference any table.
    #[error("{field} is not a foreign field")]
    NotForeign { field: String },

    /// Neither end of the field's link is the requested table.
    #[error("{field} is not connected to {table}")]
    NotConnected { table: String, field: String },

    /// A self-referencing field was crossed without an explicit direction.
    #[error("the field references its table: {field}, the direction must be specified")]
    AmbiguousDirection { field: String },

    /// The requested direction disagrees with the one implied by the link.
    #[error("wrong direction for {field}: {requested}, real is: {actual}")]
    DirectionConflict {
        field: String,
        requested: String,
        actual: String,
    },

    /// No foreign key connects the two tables.
    #[error("path is broken between {from} and {to}")]
    BrokenPath { from: String, to: String },

    /// A step cannot bundle zero fields.
    #[error("empty fields")]
    EmptyFields,

    /// A path was requested through no table at all.
    #[error("a path needs at least its start table")]
    EmptyPath,

    /// The bundled links do not all lead to the same table.
    #[error("fields do not point to the same table from {start}")]
    MixedEndpoints { start: String },

    /// Multi-field steps cannot infer directions on a self-reference.
    #[error("start and end are the same: {table}, the direction can't be inferred")]
    SelfReference { table: String },

    /// Row id below the minimum valid id.
    #[error("invalid ID: {id}")]
    InvalidRowId { id: RowId },

    /// A task failed while running on a worker.
    #[error("task failed on worker: {message}")]
    Execution { message: String },

    /// The caller stopped waiting before its task ran.
    #[error("interrupted while waiting for the worker")]
    Interrupted,

    /// The queue no longer accepts tasks.
    #[error("queue is closed: {name}")]
    QueueClosed { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidRowId { id: -1 };
        assert_eq!(err.to_string(), "invalid ID: -1");

        let err = Error::BrokenPath {
            from: "CLIENT".into(),
            to: "ARTICLE".into(),
        };
        assert_eq!(err.to_string(), "path is broken between CLIENT and ARTICLE");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(Error::EmptyFields, Error::EmptyFields);
        assert_ne!(Error::Interrupted, Error::EmptyFields);
    }
}
