//! Self-contained HTML report generation.
//!
//! The document embeds its own CSS so the export is a single file; the
//! review state drives the per-table "Reviewed" badges.

use chrono::Local;

use crate::diff::{SchemaDiff, TableDiff};
use crate::models::schema::{ColumnInfo, ColumnKey};
use crate::review::ReviewState;

use super::{sorted_names, summary_line};

const STYLE: &str = r#"
body { font-family: -apple-system, 'Segoe UI', sans-serif; margin: 2rem auto; max-width: 56rem; color: #1f2937; }
h1 { border-bottom: 2px solid #e5e7eb; padding-bottom: 0.5rem; }
.timestamp { color: #6b7280; }
.summary { background: #f3f4f6; padding: 0.75rem 1rem; border-radius: 0.375rem; }
.none { color: #6b7280; font-style: italic; }
.added { color: #16a34a; }
.removed { color: #dc2626; }
.badge { font-size: 0.75rem; border-radius: 0.25rem; padding: 0.125rem 0.5rem; margin-left: 0.5rem; }
.badge.reviewed { background: #dcfce7; color: #166534; }
.badge.pending { background: #fef9c3; color: #854d0e; }
code { background: #f3f4f6; padding: 0.125rem 0.25rem; border-radius: 0.25rem; }
"#;

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn review_badge(reviewed: &ReviewState, table: &str) -> &'static str {
    if reviewed.is_reviewed(table) {
        r#"<span class="badge reviewed">Reviewed</span>"#
    } else {
        r#"<span class="badge pending">Pending</span>"#
    }
}

fn column_line(info: &ColumnInfo) -> String {
    let mut text = format!(
        "<code>{}</code> <code>{}</code> {}",
        escape(&info.name),
        escape(&info.column_type),
        if info.is_nullable { "NULL" } else { "NOT NULL" },
    );
    if let Some(default) = &info.column_default {
        text.push_str(&format!(" DEFAULT {}", escape(default)));
    }
    if info.column_key != ColumnKey::None {
        text.push(' ');
        text.push_str(info.column_key.as_str());
    }
    if !info.extra.is_empty() {
        text.push(' ');
        text.push_str(&escape(&info.extra));
    }
    text
}

fn push_table_section(
    out: &mut String,
    heading: &str,
    class: &str,
    tables: &[&String],
    reviewed: &ReviewState,
) {
    out.push_str(&format!("<h2>{}</h2>\n", heading));
    if tables.is_empty() {
        out.push_str("<p class=\"none\">None</p>\n");
        return;
    }
    out.push_str("<ul>\n");
    for table in tables {
        out.push_str(&format!(
            "<li class=\"{}\"><code>{}</code>{}</li>\n",
            class,
            escape(table),
            review_badge(reviewed, table)
        ));
    }
    out.push_str("</ul>\n");
}

fn push_column_changes(out: &mut String, table_diff: &TableDiff) {
    let mut added: Vec<_> = table_diff.added_columns.values().collect();
    added.sort_by_key(|info| info.name.as_str());
    if !added.is_empty() {
        out.push_str("<h4>Added Columns</h4>\n<ul>\n");
        for info in added {
            out.push_str(&format!(
                "<li class=\"added\">+ {}</li>\n",
                column_line(info)
            ));
        }
        out.push_str("</ul>\n");
    }

    let mut removed: Vec<_> = table_diff.removed_columns.values().collect();
    removed.sort_by_key(|info| info.name.as_str());
    if !removed.is_empty() {
        out.push_str("<h4>Removed Columns</h4>\n<ul>\n");
        for info in removed {
            out.push_str(&format!(
                "<li class=\"removed\">- {}</li>\n",
                column_line(info)
            ));
        }
        out.push_str("</ul>\n");
    }
}

/// Generate an HTML report from schema differences and review marks.
pub fn build_html(diff: &SchemaDiff, reviewed: &ReviewState) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>MySQL Schema Diff Report</title>\n");
    out.push_str(&format!("<style>{}</style>\n", STYLE));
    out.push_str("</head>\n<body>\n");

    out.push_str("<h1>MySQL Schema Diff Report</h1>\n");
    out.push_str(&format!(
        "<p class=\"timestamp\">Generated on: {}</p>\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    if !diff.has_changes() {
        out.push_str("<p>No schema changes detected.</p>\n</body>\n</html>\n");
        return out;
    }

    if let Some(summary) = summary_line(diff) {
        out.push_str(&format!("<p class=\"summary\">{}</p>\n", escape(&summary)));
    }

    push_table_section(
        &mut out,
        "Added Tables",
        "added",
        &sorted_names(&diff.added_tables),
        reviewed,
    );
    push_table_section(
        &mut out,
        "Removed Tables",
        "removed",
        &sorted_names(&diff.removed_tables),
        reviewed,
    );

    out.push_str("<h2>Changed Tables</h2>\n");
    if diff.changed_tables.is_empty() {
        out.push_str("<p class=\"none\">None</p>\n");
    } else {
        let mut tables: Vec<_> = diff.changed_tables.iter().collect();
        tables.sort_by_key(|(name, _)| name.as_str());
        for (table_name, table_diff) in tables {
            out.push_str(&format!(
                "<h3><code>{}</code>{}</h3>\n",
                escape(table_name),
                review_badge(reviewed, table_name)
            ));
            push_column_changes(&mut out, table_diff);
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}
