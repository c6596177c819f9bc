//! MySQL schema diff reporter.
//!
//! Loads the table/column metadata of two databases, computes which tables
//! and columns were added or removed, and renders the result as Markdown or
//! HTML reports with per-table review tracking. The comparison itself lives
//! in [`diff`] and is a pure function over two [`models::schema::SchemaSnapshot`]s.

pub mod client;
pub mod db;
pub mod diff;
pub mod errors;
pub mod models;
pub mod report;
pub mod review;

pub use diff::{compute_schema_diff, SchemaDiff, TableDiff};
pub use models::schema::{ColumnInfo, SchemaSnapshot};
