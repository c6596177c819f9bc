use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Key role of a column, as reported by `information_schema.COLUMNS.COLUMN_KEY`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKey {
    Primary,
    Unique,
    Index,
    #[default]
    None,
}

impl ColumnKey {
    /// Parse the `COLUMN_KEY` token. Unknown tokens fall back to `None`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PRI" => ColumnKey::Primary,
            "UNI" => ColumnKey::Unique,
            "MUL" => ColumnKey::Index,
            _ => ColumnKey::None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnKey::Primary => "PRI",
            ColumnKey::Unique => "UNI",
            ColumnKey::Index => "MUL",
            ColumnKey::None => "",
        }
    }
}

/// Declared properties of one column in one snapshot.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub column_type: String,
    pub is_nullable: bool,
    pub column_default: Option<String>,
    pub column_key: ColumnKey,
    pub extra: String,
}

impl ColumnInfo {
    /// One-line description used by the diff view, e.g.
    /// `created_at (datetime) NOT NULL DEFAULT CURRENT_TIMESTAMP`.
    pub fn summary(&self) -> String {
        let mut text = format!("{} ({})", self.name, self.column_type);
        if !self.is_nullable {
            text.push_str(" NOT NULL");
        }
        if let Some(default) = &self.column_default {
            text.push_str(&format!(" DEFAULT {}", default));
        }
        if self.column_key != ColumnKey::None {
            text.push(' ');
            text.push_str(self.column_key.as_str());
        }
        if !self.extra.is_empty() {
            text.push(' ');
            text.push_str(&self.extra);
        }
        text
    }
}

/// Captured state of one database's schema: the set of base tables and,
/// per table, its columns keyed by name.
///
/// A table missing from `columns` is treated as having zero columns.
/// Iteration order is unspecified; consumers sort before display.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    pub tables: HashSet<String>,
    pub columns: HashMap<String, HashMap<String, ColumnInfo>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            data_type: "int".to_string(),
            column_type: "int(11)".to_string(),
            is_nullable: false,
            column_default: None,
            column_key: ColumnKey::None,
            extra: String::new(),
        }
    }

    #[test]
    fn test_column_key_parse() {
        assert_eq!(ColumnKey::parse("PRI"), ColumnKey::Primary);
        assert_eq!(ColumnKey::parse("UNI"), ColumnKey::Unique);
        assert_eq!(ColumnKey::parse("MUL"), ColumnKey::Index);
        assert_eq!(ColumnKey::parse(""), ColumnKey::None);
        assert_eq!(ColumnKey::parse("something else"), ColumnKey::None);
    }

    #[test]
    fn test_column_key_round_trip() {
        for key in [
            ColumnKey::Primary,
            ColumnKey::Unique,
            ColumnKey::Index,
            ColumnKey::None,
        ] {
            assert_eq!(ColumnKey::parse(key.as_str()), key);
        }
    }

    #[test]
    fn test_summary_minimal() {
        let mut info = column("id");
        info.is_nullable = true;
        assert_eq!(info.summary(), "id (int(11))");
    }

    #[test]
    fn test_summary_full() {
        let info = ColumnInfo {
            name: "id".to_string(),
            data_type: "bigint".to_string(),
            column_type: "bigint unsigned".to_string(),
            is_nullable: false,
            column_default: Some("0".to_string()),
            column_key: ColumnKey::Primary,
            extra: "auto_increment".to_string(),
        };
        assert_eq!(
            info.summary(),
            "id (bigint unsigned) NOT NULL DEFAULT 0 PRI auto_increment"
        );
    }
}
