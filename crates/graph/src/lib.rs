//! Vista Graph - navigation across foreign keys.
//!
//! This crate describes how to go from one table to another by crossing
//! foreign keys, with the direction of every crossing made explicit.
//!
//! # Core Concepts
//!
//! - `Direction`: which way a foreign key is crossed
//! - `Link`: the undirected fact "table A and table B are connected by field F"
//! - `DatabaseGraph`: every link of a schema, indexed by table and table pair
//! - `Step`: one hop between two tables over one or more parallel fields
//! - `Path`: a chain of steps
//!
//! # Example
//!
//! ```ignore
//! use vista_graph::{DatabaseGraph, Direction, Path, Step};
//!
//! let graph = DatabaseGraph::new(schema);
//! let client = graph.schema().table_id("CLIENT")?;
//! let pays = graph.schema().table_id("PAYS")?;
//!
//! let step = Step::between(&graph, client, pays)?;
//! assert_eq!(step.direction(), Direction::TowardReference);
//!
//! let path = Path::new(client).with_step(step)?;
//! assert_eq!(path.reverse().to(), client);
//! ```

mod database;
mod direction;
mod link;
mod path;
mod step;

pub use database::DatabaseGraph;
pub use direction::Direction;
pub use link::Link;
pub use path::Path;
pub use step::Step;
