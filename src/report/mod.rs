//! Report generation from a computed [`SchemaDiff`](crate::diff::SchemaDiff).
//!
//! Both renderers sort every table and column list lexicographically before
//! display; the diff itself carries no ordering.

use std::collections::HashSet;
use std::path::Path;

use crate::diff::SchemaDiff;
use crate::errors::DbError;

pub mod html;
pub mod markdown;

/// Summary fragment like `+2 tables, -1 tables, 3 tables changed`, or `None`
/// when the diff is empty.
pub fn summary_line(diff: &SchemaDiff) -> Option<String> {
    let mut parts = Vec::new();
    if !diff.added_tables.is_empty() {
        parts.push(format!("+{} tables", diff.added_tables.len()));
    }
    if !diff.removed_tables.is_empty() {
        parts.push(format!("-{} tables", diff.removed_tables.len()));
    }
    if !diff.changed_tables.is_empty() {
        parts.push(format!("{} tables changed", diff.changed_tables.len()));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

pub(crate) fn sorted_names(names: &HashSet<String>) -> Vec<&String> {
    let mut sorted: Vec<_> = names.iter().collect();
    sorted.sort();
    sorted
}

/// Write a rendered report to disk.
pub fn write_report(path: &Path, contents: &str) -> Result<(), DbError> {
    std::fs::write(path, contents).map_err(|e| DbError::Export(e.to_string()))
}
