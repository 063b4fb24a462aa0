//! Column types and the typed value representation stored in rows and keys.

use crate::error::{GatorError, GatorResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The primary-key representation used both as the clustered tree's key
/// type and as the packed entries of non-clustered PK lists.
///
/// Packed as 32-bit little-endian integers on disk (see `crate::index`),
/// matching GatorDB's historical `np.int32` PK encoding.
pub type Pk = i32;

/// A column's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DbType {
    Integer,
    Float,
    Text,
}

impl DbType {
    /// Resolves a recognized type name (case-insensitive) to a `DbType`.
    ///
    /// Recognizes `integer`/`int` as `Integer`, `varchar`/`text` as `Text`,
    /// and `float` as `Float`; anything else is `UnknownType`.
    pub fn parse(name: &str) -> GatorResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(DbType::Integer),
            "varchar" | "text" => Ok(DbType::Text),
            "float" => Ok(DbType::Float),
            other => Err(GatorError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbType::Integer => write!(f, "integer"),
            DbType::Float => write!(f, "float"),
            DbType::Text => write!(f, "text"),
        }
    }
}

/// A typed column value.
///
/// Serializes untagged so that a `Row` (a `HashMap<String, Value>`) produces
/// a plain JSON object whose values are ordinary numbers/strings, per the
/// on-disk serialized-row format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Coerces a literal string to this `DbType`, stripping a single outer
    /// pair of `"` or `'` quotes from text values first.
    pub fn coerce(dbtype: DbType, column: &str, literal: &str) -> GatorResult<Self> {
        let bad = || GatorError::BadValueLiteral {
            column: column.to_string(),
            expected: dbtype.to_string(),
            literal: literal.to_string(),
        };
        match dbtype {
            DbType::Integer => literal.parse::<i64>().map(Value::Integer).map_err(|_| bad()),
            DbType::Float => literal.parse::<f64>().map(Value::Float).map_err(|_| bad()),
            DbType::Text => Ok(Value::Text(strip_outer_quotes(literal).to_string())),
        }
    }

    /// Interprets this value as a primary key, checking that it fits `Pk`.
    pub fn as_pk(&self, column: &str) -> GatorResult<Pk> {
        match self {
            Value::Integer(i) => Pk::try_from(*i).map_err(|_| GatorError::BadValueLiteral {
                column: column.to_string(),
                expected: "32-bit integer".to_string(),
                literal: i.to_string(),
            }),
            other => Err(GatorError::BadValueLiteral {
                column: column.to_string(),
                expected: "integer".to_string(),
                literal: format!("{other:?}"),
            }),
        }
    }
}

fn strip_outer_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'') && first == last {
            return &s[1..s.len() - 1];
        }
    }
    s
}

impl Eq for Value {}

/// Total ordering: integers numerically, text lexicographically by byte,
/// floats via `total_cmp` so that NaN has a well-defined (if arbitrary)
/// position instead of breaking tree invariants.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            // Values within one column always share a variant; cross-variant
            // comparisons only arise from caller misuse and are ordered by
            // discriminant so the tree invariant still holds.
            (a, b) => discriminant(a).cmp(&discriminant(b)),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn discriminant(v: &Value) -> u8 {
    match v {
        Value::Integer(_) => 0,
        Value::Float(_) => 1,
        Value::Text(_) => 2,
    }
}
