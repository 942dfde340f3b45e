//! Vista Search - incrementally maintained, filtered lists of lines.
//!
//! A `SearchQueue` owns the lines of one view and the filter applied to
//! them. Each line is a root row materialized along the view's prototype
//! paths. When a row changes anywhere in the database, only the lines that
//! reach it through some prototype path are re-resolved and filtered again.
//!
//! # Core Concepts
//!
//! - `SearchQueue`: single-worker task queue owning the list and the filter
//! - `Filter` / `FilterSpec`: what lines are shown
//! - `RowChange`: a changed row, delivered directly or through a `ChangeFeed`
//! - `ListChange`: what subscribers receive after every pass
//!
//! # Example
//!
//! ```ignore
//! use vista_search::{ContainsFilter, RowChange, SearchQueue, SearchQueueConfig};
//!
//! let queue = SearchQueue::new(SearchQueueConfig::new("clients"), &graph, client, source)?;
//! queue.subscribe(|change| println!("visible: {:?}", change.visible));
//!
//! queue.replace_list(lines)?;
//! queue.set_filter(Some(Arc::new(ContainsFilter::new(Path::new(client), 0, "ali"))))?;
//!
//! queue.row_changed(RowChange::new(pays, 7, [0]))?;
//! let affected = queue.affected_lines(pays, 7)?;
//! ```

mod change;
mod config;
mod feed;
mod filter;
mod list_change;
mod queue;
mod state;
mod subscription;
mod task;

#[cfg(test)]
pub(crate) mod fixtures;

pub use change::RowChange;
pub use config::SearchQueueConfig;
pub use feed::{ChangeFeed, ChangeListener, ListenerId};
pub use filter::{matches, AllOf, ContainsFilter, Filter, FilterSpec};
pub use list_change::ListChange;
pub use queue::{AffectedLines, AffectedPaths, SearchQueue};
pub use subscription::{ChangeCallback, SubscriptionId};
