use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt;

/// PostgreSQL column type inferred from a sample value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Decimal,
    Jsonb,
    Timestamp,
    Text,
    Varchar,
}

impl ColumnType {
    /// SQL spelling of this type
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Jsonb => "JSONB",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Text => "TEXT",
            ColumnType::Varchar => "VARCHAR(255)",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Infer a column type from a sample JSON value.
///
/// Booleans map to INTEGER to keep parity with existing tables, which were
/// created by tooling that treated them as integers.
pub fn infer_column_type(sample: &Value) -> ColumnType {
    match sample {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                ColumnType::Integer
            } else {
                ColumnType::Decimal
            }
        }
        Value::Bool(_) => ColumnType::Integer,
        Value::Object(_) => ColumnType::Jsonb,
        Value::String(s) => {
            if is_iso_datetime(s) {
                ColumnType::Timestamp
            } else if s.len() > 255 {
                ColumnType::Text
            } else {
                ColumnType::Varchar
            }
        }
        _ => ColumnType::Text,
    }
}

/// Check whether a string parses as an ISO-8601 date or datetime
fn is_iso_datetime(s: &str) -> bool {
    if DateTime::parse_from_rfc3339(s).is_ok() {
        return true;
    }
    if NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok() {
        return true;
    }
    if NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok() {
        return true;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
