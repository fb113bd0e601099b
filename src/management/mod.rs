//! State owned by a collection run and its persistence.
//!
//! - [`CollectionAccumulator`] gathers rows from the pagination drivers and
//!   merges interaction flags per natural key.
//! - [`normalize`] collapses the gathered tables to one row per key.
//! - [`SqliteStore`] upserts the tables, one transaction per table.
//! - [`collector`] wires the passes together for a single run.

mod accumulator;
pub mod collector;
mod normalize;
mod schema;
mod store;

pub use accumulator::CollectionAccumulator;
pub use collector::{CollectError, RunReport, SourceKind, Sources, collect_user_data};
pub use normalize::{CollectionTables, normalize};
pub use schema::{COLLECTION_VERSIONED_SCHEMAS, CollectionSchema};
pub use store::{PersistError, SqliteStore, TableOutcome, UpsertRow};
