//! Schema difference engine.
//!
//! Pure, synchronous comparison of two already-loaded [`SchemaSnapshot`]s.
//! Columns are compared by name presence only: a column that exists in both
//! snapshots is never reported as changed, even if its type or default
//! differs.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::schema::{ColumnInfo, SchemaSnapshot};

/// Column-level result for one table present in both snapshots.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TableDiff {
    /// Columns present only in the new snapshot, with their new descriptors.
    pub added_columns: HashMap<String, ColumnInfo>,
    /// Columns present only in the old snapshot, with their old descriptors.
    pub removed_columns: HashMap<String, ColumnInfo>,
}

impl TableDiff {
    pub fn has_changes(&self) -> bool {
        !self.added_columns.is_empty() || !self.removed_columns.is_empty()
    }
}

/// Complete table- and column-level difference between two snapshots.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    pub added_tables: HashSet<String>,
    pub removed_tables: HashSet<String>,
    /// Tables present in both snapshots whose column-name sets differ.
    /// Tables with identical column-name sets are omitted entirely.
    pub changed_tables: HashMap<String, TableDiff>,
}

impl SchemaDiff {
    pub fn has_changes(&self) -> bool {
        !self.added_tables.is_empty()
            || !self.removed_tables.is_empty()
            || !self.changed_tables.is_empty()
    }
}

/// Compare table-name sets: returns `(added, removed, common)`.
pub fn diff_tables(
    old_tables: &HashSet<String>,
    new_tables: &HashSet<String>,
) -> (HashSet<String>, HashSet<String>, HashSet<String>) {
    let added = new_tables.difference(old_tables).cloned().collect();
    let removed = old_tables.difference(new_tables).cloned().collect();
    let common = old_tables.intersection(new_tables).cloned().collect();
    (added, removed, common)
}

/// Compare the column mappings of one table between the old and new snapshot.
///
/// Names present in both mappings are ignored regardless of attribute
/// equality. Empty mappings are valid inputs.
pub fn diff_columns(
    old_columns: &HashMap<String, ColumnInfo>,
    new_columns: &HashMap<String, ColumnInfo>,
) -> TableDiff {
    let added_columns = new_columns
        .iter()
        .filter(|(name, _)| !old_columns.contains_key(*name))
        .map(|(name, info)| (name.clone(), info.clone()))
        .collect();
    let removed_columns = old_columns
        .iter()
        .filter(|(name, _)| !new_columns.contains_key(*name))
        .map(|(name, info)| (name.clone(), info.clone()))
        .collect();

    TableDiff {
        added_columns,
        removed_columns,
    }
}

/// Compute the complete schema difference between two snapshots.
///
/// Output membership is determined by set membership alone, so the result is
/// a deterministic function of the inputs. Tables missing from a snapshot's
/// column mapping are treated as having zero columns.
pub fn compute_schema_diff(old: &SchemaSnapshot, new: &SchemaSnapshot) -> SchemaDiff {
    let (added_tables, removed_tables, common_tables) = diff_tables(&old.tables, &new.tables);

    let empty = HashMap::new();
    let mut changed_tables = HashMap::new();
    for table in &common_tables {
        let old_columns = old.columns.get(table).unwrap_or(&empty);
        let new_columns = new.columns.get(table).unwrap_or(&empty);

        let table_diff = diff_columns(old_columns, new_columns);
        if table_diff.has_changes() {
            changed_tables.insert(table.clone(), table_diff);
        }
    }

    SchemaDiff {
        added_tables,
        removed_tables,
        changed_tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::ColumnKey;

    fn column(name: &str, column_type: &str) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            data_type: column_type
                .split('(')
                .next()
                .unwrap_or(column_type)
                .to_string(),
            column_type: column_type.to_string(),
            is_nullable: false,
            column_default: None,
            column_key: ColumnKey::None,
            extra: String::new(),
        }
    }

    fn columns(names: &[(&str, &str)]) -> HashMap<String, ColumnInfo> {
        names
            .iter()
            .map(|(name, column_type)| (name.to_string(), column(name, column_type)))
            .collect()
    }

    fn names(values: &[&str]) -> HashSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn snapshot(tables: &[(&str, &[(&str, &str)])]) -> SchemaSnapshot {
        SchemaSnapshot {
            tables: tables.iter().map(|(t, _)| t.to_string()).collect(),
            columns: tables
                .iter()
                .map(|(t, cols)| (t.to_string(), columns(cols)))
                .collect(),
        }
    }

    #[test]
    fn test_table_sets_partition() {
        let old = names(&["users", "orders", "shared"]);
        let new = names(&["users", "invoices", "shared"]);

        let (added, removed, common) = diff_tables(&old, &new);

        assert_eq!(added, names(&["invoices"]));
        assert_eq!(removed, names(&["orders"]));
        assert_eq!(common, names(&["users", "shared"]));

        // added/removed/common are pairwise disjoint and partition old ∪ new
        assert!(added.is_disjoint(&removed));
        assert!(added.is_disjoint(&common));
        assert!(removed.is_disjoint(&common));
        let union: HashSet<String> = added
            .union(&removed)
            .chain(common.iter())
            .cloned()
            .collect();
        let expected: HashSet<String> = old.union(&new).cloned().collect();
        assert_eq!(union, expected);
    }

    #[test]
    fn test_noop_diff_is_empty() {
        let snap = snapshot(&[
            ("users", &[("id", "int"), ("email", "varchar(255)")]),
            ("orders", &[("id", "int")]),
        ]);

        let diff = compute_schema_diff(&snap, &snap.clone());

        assert!(!diff.has_changes());
        assert!(diff.added_tables.is_empty());
        assert!(diff.removed_tables.is_empty());
        assert!(diff.changed_tables.is_empty());
    }

    #[test]
    fn test_attribute_change_is_not_a_diff() {
        // Scenario C: same column names, differing column_type.
        let old = snapshot(&[("users", &[("id", "int")])]);
        let new = snapshot(&[("users", &[("id", "bigint")])]);

        let diff = compute_schema_diff(&old, &new);

        assert!(!diff.has_changes());
        assert!(!diff.changed_tables.contains_key("users"));
    }

    #[test]
    fn test_table_add_remove() {
        // Scenario A
        let old = snapshot(&[("users", &[("id", "int")]), ("orders", &[("id", "int")])]);
        let new = snapshot(&[("users", &[("id", "int")]), ("invoices", &[("id", "int")])]);

        let diff = compute_schema_diff(&old, &new);

        assert_eq!(diff.added_tables, names(&["invoices"]));
        assert_eq!(diff.removed_tables, names(&["orders"]));
        // users has identical columns, so it produces no entry
        assert!(diff.changed_tables.is_empty());
        assert!(diff.has_changes());
    }

    #[test]
    fn test_column_added() {
        // Scenario B
        let old = columns(&[("id", "int"), ("email", "varchar(255)")]);
        let new = columns(&[
            ("id", "int"),
            ("email", "varchar(255)"),
            ("created_at", "datetime"),
        ]);

        let table_diff = diff_columns(&old, &new);

        assert!(table_diff.has_changes());
        assert_eq!(table_diff.added_columns.len(), 1);
        assert!(table_diff.removed_columns.is_empty());
        let added = &table_diff.added_columns["created_at"];
        assert_eq!(added.column_type, "datetime");
    }

    #[test]
    fn test_column_removed_keeps_old_descriptor() {
        let old = columns(&[("id", "int"), ("legacy", "text")]);
        let new = columns(&[("id", "int")]);

        let table_diff = diff_columns(&old, &new);

        assert!(table_diff.added_columns.is_empty());
        assert_eq!(table_diff.removed_columns.len(), 1);
        assert_eq!(table_diff.removed_columns["legacy"].column_type, "text");
    }

    #[test]
    fn test_empty_column_maps_are_valid() {
        let table_diff = diff_columns(&HashMap::new(), &HashMap::new());
        assert!(!table_diff.has_changes());

        let only_new = diff_columns(&HashMap::new(), &columns(&[("id", "int")]));
        assert_eq!(only_new.added_columns.len(), 1);
        assert!(only_new.removed_columns.is_empty());
    }

    #[test]
    fn test_missing_column_mapping_defaults_to_empty() {
        // "users" is in both table sets but has no column mapping in the old
        // snapshot; it must be treated as having zero columns there.
        let mut old = snapshot(&[("users", &[("id", "int")])]);
        old.columns.clear();
        let new = snapshot(&[("users", &[("id", "int")])]);

        let diff = compute_schema_diff(&old, &new);

        let users = &diff.changed_tables["users"];
        assert_eq!(users.added_columns.len(), 1);
        assert!(users.removed_columns.is_empty());
    }

    #[test]
    fn test_changed_tables_filtering_is_complete() {
        let old = snapshot(&[
            ("unchanged", &[("id", "int")]),
            ("grown", &[("id", "int")]),
            ("shrunk", &[("id", "int"), ("legacy", "text")]),
        ]);
        let new = snapshot(&[
            ("unchanged", &[("id", "int")]),
            ("grown", &[("id", "int"), ("note", "text")]),
            ("shrunk", &[("id", "int")]),
        ]);

        let diff = compute_schema_diff(&old, &new);

        // every common table appears in changed_tables iff its column diff
        // has at least one added or removed name
        assert_eq!(diff.changed_tables.len(), 2);
        assert!(diff.changed_tables.contains_key("grown"));
        assert!(diff.changed_tables.contains_key("shrunk"));
        assert!(!diff.changed_tables.contains_key("unchanged"));
    }

    #[test]
    fn test_identical_schemas_have_no_changes() {
        // Scenario D
        let old = snapshot(&[("a", &[("id", "int")]), ("b", &[("id", "int")])]);
        let new = snapshot(&[("a", &[("id", "int")]), ("b", &[("id", "int")])]);

        assert!(!compute_schema_diff(&old, &new).has_changes());
    }
}
