//! Cell values and records handed over by data sources.

use chrono::NaiveDateTime;
use rusqlite::types::{Null, ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Null,
}

/// One row of source data: ordered (column, value) pairs. The order of the
/// first record drives the order of the inferred columns.
pub type Record = Vec<(String, Value)>;

impl Value {
    /// Look a column up in a record by name.
    pub fn of<'a>(record: &'a Record, column: &str) -> Option<&'a Value> {
        record
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Float(f) => ToSqlOutput::from(*f),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            // %.f keeps sub-second precision when present and renders
            // nothing for whole seconds.
            Value::DateTime(dt) => {
                ToSqlOutput::from(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string())
            }
            Value::Null => ToSqlOutput::from(Null),
        })
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            // Booleans, arrays and objects have no relational shape of
            // their own; store their JSON rendering.
            other => Value::Text(other.to_string()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}
