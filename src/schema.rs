//! Schema inference and DDL rendering.
//!
//! Columns are derived exactly once, at table-creation time, from the first
//! record of the dataset or from an explicit schema override. They are never
//! altered afterward for the table's lifetime; the invalidation path only
//! truncates and reloads.

use crate::error::{Result, TushieError};
use crate::value::{Record, Value};
use serde::{Deserialize, Serialize};

/// Declarable column types. `String` is the catch-all for values with no
/// better relational shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    DateTime,
    String,
}

impl ColumnType {
    fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::DateTime => "DATETIME",
            ColumnType::String => "TEXT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    /// Auto-incrementing integer primary key. At most one per table.
    pub primary_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            primary_key: false,
        }
    }

    pub fn primary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ColumnType::Integer,
            primary_key: true,
        }
    }

    /// Rendered column definition. Non-key columns carry no NOT NULL
    /// constraint: inference never assumes completeness of future rows.
    ///
    /// The key is the plain rowid alias, not AUTOINCREMENT: id assignment
    /// must restart after a full-table delete, and the AUTOINCREMENT
    /// counter in `sqlite_sequence` survives one.
    pub fn sql_definition(&self) -> String {
        if self.primary_key {
            format!("{} INTEGER PRIMARY KEY", quote_ident(&self.name))
        } else {
            format!("{} {}", quote_ident(&self.name), self.ty.sql_type())
        }
    }
}

/// Double-quote an identifier for SQLite.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render a CREATE TABLE statement, or fail with `EmptySchema` when there is
/// nothing to create (SQL cannot express a zero-column table).
pub fn create_table_sql(table: &str, columns: &[Column]) -> Result<String> {
    if columns.is_empty() {
        return Err(TushieError::EmptySchema);
    }
    let defs: Vec<String> = columns.iter().map(Column::sql_definition).collect();
    Ok(format!(
        "CREATE TABLE {} ({})",
        quote_ident(table),
        defs.join(", ")
    ))
}

fn infer_type(value: &Value) -> ColumnType {
    match value {
        Value::Integer(_) | Value::Float(_) => ColumnType::Float,
        Value::Text(_) => ColumnType::Text,
        Value::DateTime(_) => ColumnType::DateTime,
        Value::Null => ColumnType::String,
    }
}

/// Derive the ordered column set for a dataset.
///
/// Type inference runs over `sample` (the dataset's first record); an entry
/// in `overrides` always wins over the inferred type. Without a sample the
/// overrides alone define the columns. A `primary_key` column that is absent
/// while `incrementing` is set is synthesized first; one that is present and
/// integer-typed becomes the auto-increment key instead of a plain column.
pub fn infer_columns(
    sample: Option<&Record>,
    overrides: &[(String, ColumnType)],
    primary_key: &str,
    incrementing: bool,
    wants_timestamps: bool,
) -> Vec<Column> {
    let override_for = |name: &str| {
        overrides
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    };

    let names: Vec<&str> = match sample {
        Some(record) => record.iter().map(|(name, _)| name.as_str()).collect(),
        None => overrides.iter().map(|(name, _)| name.as_str()).collect(),
    };

    let mut columns = Vec::new();

    if incrementing && !names.iter().any(|n| *n == primary_key) {
        columns.push(Column::primary(primary_key));
    }

    match sample {
        Some(record) => {
            for (name, value) in record {
                let ty = override_for(name).unwrap_or_else(|| infer_type(value));
                if name == primary_key && ty == ColumnType::Integer {
                    columns.push(Column::primary(name.clone()));
                } else {
                    columns.push(Column::new(name.clone(), ty));
                }
            }
        }
        None => {
            for (name, ty) in overrides {
                if name == primary_key && *ty == ColumnType::Integer {
                    columns.push(Column::primary(name.clone()));
                } else {
                    columns.push(Column::new(name.clone(), *ty));
                }
            }
        }
    }

    let has_both_timestamps =
        names.iter().any(|n| *n == "created_at") && names.iter().any(|n| *n == "updated_at");
    if wants_timestamps && !has_both_timestamps {
        columns.push(Column::new("created_at", ColumnType::DateTime));
        columns.push(Column::new("updated_at", ColumnType::DateTime));
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: Vec<(&str, Value)>) -> Record {
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    #[test]
    fn infers_types_from_sample_values() {
        let sample = record(vec![
            ("count", Value::Integer(3)),
            ("price", Value::Float(1.5)),
            ("label", Value::from("x")),
            ("blank", Value::Null),
        ]);
        let columns = infer_columns(Some(&sample), &[], "id", false, false);
        let types: Vec<ColumnType> = columns.iter().map(|c| c.ty).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Float,
                ColumnType::Float,
                ColumnType::Text,
                ColumnType::String
            ]
        );
    }

    #[test]
    fn override_wins_over_inference() {
        let sample = record(vec![("x", Value::Integer(1))]);
        let overrides = vec![("x".to_string(), ColumnType::Text)];
        let columns = infer_columns(Some(&sample), &overrides, "id", false, false);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].ty, ColumnType::Text);
    }

    #[test]
    fn synthesizes_missing_auto_increment_key_first() {
        let sample = record(vec![("name", Value::from("a"))]);
        let columns = infer_columns(Some(&sample), &[], "id", true, false);
        assert_eq!(columns[0].name, "id");
        assert!(columns[0].primary_key);
        assert_eq!(columns[1].name, "name");
    }

    #[test]
    fn integer_typed_key_becomes_the_auto_increment_key() {
        let sample = record(vec![("id", Value::Integer(7)), ("name", Value::from("a"))]);
        let overrides = vec![("id".to_string(), ColumnType::Integer)];
        let columns = infer_columns(Some(&sample), &overrides, "id", true, false);
        // Present in the sample, so nothing is synthesized up front.
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "id");
        assert!(columns[0].primary_key);
        assert!(!columns[1].primary_key);
    }

    #[test]
    fn appends_timestamps_when_not_both_present() {
        let sample = record(vec![("name", Value::from("a"))]);
        let columns = infer_columns(Some(&sample), &[], "id", false, true);
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["name", "created_at", "updated_at"]);
        assert_eq!(columns[1].ty, ColumnType::DateTime);
        assert_eq!(columns[2].ty, ColumnType::DateTime);
    }

    #[test]
    fn no_extra_timestamps_when_both_present() {
        let sample = record(vec![
            ("name", Value::from("a")),
            ("created_at", Value::from("2024-01-01 00:00:00")),
            ("updated_at", Value::from("2024-01-01 00:00:00")),
        ]);
        let columns = infer_columns(Some(&sample), &[], "id", false, true);
        assert_eq!(columns.len(), 3);
    }

    #[test]
    fn schema_only_source_uses_overrides() {
        let overrides = vec![
            ("id".to_string(), ColumnType::Integer),
            ("note".to_string(), ColumnType::Text),
        ];
        let columns = infer_columns(None, &overrides, "id", true, false);
        assert_eq!(columns.len(), 2);
        assert!(columns[0].primary_key);
        assert_eq!(columns[1].ty, ColumnType::Text);
    }

    #[test]
    fn empty_source_yields_key_only_or_nothing() {
        let columns = infer_columns(None, &[], "id", true, false);
        assert_eq!(columns.len(), 1);
        assert!(columns[0].primary_key);

        let columns = infer_columns(None, &[], "id", false, false);
        assert!(columns.is_empty());
        assert!(matches!(
            create_table_sql("t", &columns),
            Err(TushieError::EmptySchema)
        ));
    }

    #[test]
    fn renders_quoted_ddl() {
        let columns = vec![Column::primary("id"), Column::new("name", ColumnType::Text)];
        let sql = create_table_sql("tushie_abc", &columns).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"tushie_abc\" (\"id\" INTEGER PRIMARY KEY, \"name\" TEXT)"
        );
    }
}
