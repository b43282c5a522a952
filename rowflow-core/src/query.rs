//! Query and row value model.
//!
//! Queries are immutable `{text, params}` pairs bound positionally against
//! `?` placeholders. Result rows are materialized into an owned, dynamic
//! representation so they can outlive the connection that produced them
//! (and so the query cache can hold them without borrowing a session).

use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as SqlxRow, TypeInfo, ValueRef};

use crate::error::{DbError, Result};

/// Statement verbs recognized when deriving a cache key or a log line from
/// an arbitrary piece of text.
const SQL_VERBS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "DROP", "ALTER", "WITH",
];

/// Returns true when the trimmed text starts with a recognized SQL verb
/// (case-insensitive). Used by the cache and the query logger to decide
/// whether a statement is worth keying/recording.
pub fn looks_like_sql(text: &str) -> bool {
    let t = text.trim_start();
    SQL_VERBS
        .iter()
        .any(|verb| t.get(..verb.len()).is_some_and(|head| head.eq_ignore_ascii_case(verb)))
}

/// An owned SQLite-shaped scalar: bind parameter or result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Bind this value onto a sqlx query, preserving positional order.
    pub(crate) fn bind_to<'q>(
        &self,
        q: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        match self {
            Value::Null => q.bind(Option::<i64>::None),
            Value::Integer(i) => q.bind(*i),
            Value::Real(f) => q.bind(*f),
            Value::Text(s) => q.bind(s.clone()),
            Value::Blob(b) => q.bind(b.clone()),
        }
    }

    /// JSON rendering for display and NDJSON output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Integer(i) => json!(i),
            Value::Real(f) => json!(f),
            Value::Text(s) => json!(s),
            Value::Blob(b) => json!(b),
        }
    }

    /// Numeric view of the value, if it has one. Used by scalar
    /// projections feeding the online aggregator.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
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
        Value::Real(v)
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

/// One result row: ordered (column name, value) pairs.
/// Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

/// An ordered, fully-materialized result set.
pub type ResultSet = Vec<Row>;

impl Row {
    /// Look up a cell by column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, v)| v)
    }

    /// Cell by position.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.columns.get(index).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// JSON object rendering, preserving column order semantics where the
    /// serializer allows.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .columns
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Materialize a sqlx SQLite row into the owned representation,
    /// decoding each column by its declared type and falling back to text.
    pub(crate) fn from_sqlite(row: &SqliteRow) -> Result<Self> {
        let mut columns = Vec::with_capacity(row.len());
        for (i, col) in row.columns().iter().enumerate() {
            let raw = row.try_get_raw(i).map_err(DbError::from_sqlx)?;
            let value = if raw.is_null() {
                Value::Null
            } else {
                match raw.type_info().name() {
                    "INTEGER" | "BOOLEAN" => {
                        Value::Integer(row.try_get::<i64, _>(i).map_err(DbError::from_sqlx)?)
                    }
                    "REAL" => Value::Real(row.try_get::<f64, _>(i).map_err(DbError::from_sqlx)?),
                    "BLOB" => {
                        Value::Blob(row.try_get::<Vec<u8>, _>(i).map_err(DbError::from_sqlx)?)
                    }
                    _ => Value::Text(row.try_get::<String, _>(i).map_err(DbError::from_sqlx)?),
                }
            };
            columns.push((col.name().to_string(), value));
        }
        Ok(Self { columns })
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: Vec<(&str, Value)>) -> Self {
        Self {
            columns: pairs
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }
}

/// An immutable parameterized statement.
///
/// Identity for caching purposes is the trimmed statement text alone;
/// parameters are deliberately NOT part of the identity (see `cache`).
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    params: Vec<Value>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// Append a positional bind value.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Whether the statement text starts with a recognized SQL verb.
    pub fn looks_like_sql(&self) -> bool {
        looks_like_sql(&self.text)
    }
}
