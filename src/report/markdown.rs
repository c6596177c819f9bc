//! Markdown report generation.

use chrono::Local;

use crate::diff::SchemaDiff;
use crate::models::schema::{ColumnInfo, ColumnKey};

use super::{sorted_names, summary_line};

/// Format one column as a report line, e.g.
/// `` `created_at` `datetime` NOT NULL DEFAULT CURRENT_TIMESTAMP ``.
fn format_column_info(info: &ColumnInfo) -> String {
    let mut parts = vec![
        format!("`{}`", info.name),
        format!("`{}`", info.column_type),
        if info.is_nullable { "NULL" } else { "NOT NULL" }.to_string(),
    ];

    if let Some(default) = &info.column_default {
        parts.push(format!("DEFAULT {}", default));
    }
    if info.column_key != ColumnKey::None {
        parts.push(info.column_key.as_str().to_string());
    }
    if !info.extra.is_empty() {
        parts.push(info.extra.clone());
    }

    parts.join(" ")
}

fn push_column_list(lines: &mut Vec<String>, heading: &str, columns: &[(&String, &ColumnInfo)]) {
    if columns.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    for (_, info) in columns {
        lines.push(format!("- {}", format_column_info(info)));
    }
    lines.push(String::new());
}

/// Generate a Markdown report from schema differences.
pub fn build_markdown(diff: &SchemaDiff) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# MySQL Schema Diff Report".to_string());
    lines.push(format!(
        "Generated on: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(String::new());

    if let Some(summary) = summary_line(diff) {
        lines.push("## Summary".to_string());
        lines.push(summary);
        lines.push(String::new());
    }

    lines.push("## Added Tables".to_string());
    if diff.added_tables.is_empty() {
        lines.push("_None_".to_string());
    } else {
        for table in sorted_names(&diff.added_tables) {
            lines.push(format!("- `{}`", table));
        }
    }
    lines.push(String::new());

    lines.push("## Removed Tables".to_string());
    if diff.removed_tables.is_empty() {
        lines.push("_None_".to_string());
    } else {
        for table in sorted_names(&diff.removed_tables) {
            lines.push(format!("- `{}`", table));
        }
    }
    lines.push(String::new());

    lines.push("## Column Changes".to_string());
    if diff.changed_tables.is_empty() {
        lines.push("_None_".to_string());
        lines.push(String::new());
    } else {
        let mut tables: Vec<_> = diff.changed_tables.iter().collect();
        tables.sort_by_key(|(name, _)| name.as_str());

        for (table_name, table_diff) in tables {
            lines.push(format!("### {}", table_name));
            lines.push(String::new());

            let mut added: Vec<_> = table_diff.added_columns.iter().collect();
            added.sort_by_key(|(name, _)| name.as_str());
            push_column_list(&mut lines, "Added columns:", &added);

            let mut removed: Vec<_> = table_diff.removed_columns.iter().collect();
            removed.sort_by_key(|(name, _)| name.as_str());
            push_column_list(&mut lines, "Removed columns:", &removed);
        }
    }

    lines.join("\n")
}
