//! Per-table review tracking for a computed diff.
//!
//! The state is an explicit value keyed by table name, owned by whichever
//! caller drives the review (the terminal UI here). It only ever consumes
//! the table-name key sets of a [`SchemaDiff`], never column-level detail.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::diff::SchemaDiff;
use crate::errors::DbError;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewState {
    entries: HashMap<String, bool>,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unreviewed entry for every table the diff names, preserving
    /// marks already made for tables seen earlier.
    pub fn seed(&mut self, diff: &SchemaDiff) {
        let tables = diff
            .added_tables
            .iter()
            .chain(diff.removed_tables.iter())
            .chain(diff.changed_tables.keys());
        for table in tables {
            self.entries.entry(table.clone()).or_insert(false);
        }
    }

    pub fn is_reviewed(&self, table: &str) -> bool {
        self.entries.get(table).copied().unwrap_or(false)
    }

    pub fn set(&mut self, table: &str, reviewed: bool) {
        self.entries.insert(table.to_string(), reviewed);
    }

    pub fn toggle(&mut self, table: &str) {
        let entry = self.entries.entry(table.to_string()).or_insert(false);
        *entry = !*entry;
    }

    pub fn check_all(&mut self) {
        for reviewed in self.entries.values_mut() {
            *reviewed = true;
        }
    }

    pub fn uncheck_all(&mut self) {
        for reviewed in self.entries.values_mut() {
            *reviewed = false;
        }
    }

    pub fn reviewed_count(&self) -> usize {
        self.entries.values().filter(|reviewed| **reviewed).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the review map as pretty JSON for the downloadable export.
    pub fn to_json(&self) -> Result<String, DbError> {
        serde_json::to_string_pretty(&self.entries).map_err(|e| DbError::Export(e.to_string()))
    }
}
