//! Vista Materialize - the joined data behind every line of a view.
//!
//! A view is rooted at one table. Its `Prototype` is the tree of every path
//! leaving that table up to a bounded number of steps; it is computed once
//! per view. Each root row is then materialized into a `RowNode` tree by
//! following the prototype and resolving the row found at every hop.
//!
//! # Core Concepts
//!
//! - `Prototype`: the bounded walk of paths from a root table, indexed by end table
//! - `RowSource`: where rows are fetched from (`MemoryRowSource` keeps them in memory)
//! - `RowNode`: a resolved row or an unresolved placeholder, with its children per step
//! - `Line`: one root row and its row-value graph
//! - `Materializer`: builds lines and re-resolves their subtrees
//!
//! # Example
//!
//! ```ignore
//! use vista_materialize::{Materializer, MemoryRowSource, Prototype, PrototypeOptions};
//!
//! let prototype = Prototype::build(&graph, client, PrototypeOptions::default())?;
//! let materializer = Materializer::new(Arc::new(prototype), Arc::new(source));
//!
//! let line = materializer.line(client_row);
//! let pays = line.follow_path(&path_to_pays);
//! ```

mod line;
mod materializer;
mod prototype;
mod row_node;
mod row_source;

#[cfg(test)]
pub(crate) mod fixtures;

pub use line::Line;
pub use materializer::Materializer;
pub use prototype::{Prototype, PrototypeNode, PrototypeOptions};
pub use row_node::{Edge, RowNode};
pub use row_source::{MemoryRowSource, RowSource};
