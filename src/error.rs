//! Error types for the GatorDB storage engine.
//!
//! All public APIs return `GatorResult<T>` — no panics in library code for
//! conditions a caller can reasonably trigger.

use thiserror::Error;

/// Unified error type for all GatorDB operations.
#[derive(Debug, Error)]
pub enum GatorError {
    /// Insert row's column set does not match the table's declared columns.
    #[error("invalid shape: row columns do not match table '{table}'")]
    InvalidShape { table: String },

    /// Filter or update referenced a column the table does not declare.
    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// `set_primary_key` named a column that was never added to the table.
    #[error("primary key column '{0}' is not in the table")]
    PrimaryKeyNotInTable(String),

    /// A table tried to designate a second primary-key column.
    #[error("primary key already set on table '{0}'")]
    PrimaryKeyAlreadySet(String),

    /// DDL named a column type outside `integer`/`int`/`varchar`/`text`/`float`.
    #[error("unknown column type: {0}")]
    UnknownType(String),

    /// Requested table does not exist in this database directory.
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// `CREATE TABLE` named a table that already has a directory.
    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),

    /// `filter` was invoked with a condition kind the engine does not support.
    #[error("invalid condition: only equality is supported")]
    InvalidCondition,

    /// An existing table directory has no `cols` manifest.
    #[error("corrupted database: table '{0}' is missing its `cols` manifest")]
    CorruptedDatabase(String),

    /// A literal value could not be coerced to its column's declared type.
    #[error("cannot coerce '{literal}' to {expected} for column '{column}'")]
    BadValueLiteral {
        column: String,
        expected: String,
        literal: String,
    },

    /// Standard I/O error (descriptor/tree/manifest read or write).
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Row, descriptor, or tree (de)serialization error.
    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Result type alias for all GatorDB operations.
pub type GatorResult<T> = Result<T, GatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_table_not_found() {
        let err = GatorError::TableNotFound("users".to_string());
        assert_eq!(err.to_string(), "table 'users' not found");
    }

    #[test]
    fn error_display_column_not_found() {
        let err = GatorError::ColumnNotFound {
            table: "users".to_string(),
            column: "nickname".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "column 'nickname' not found in table 'users'"
        );
    }

    #[test]
    fn error_display_bad_value_literal() {
        let err = GatorError::BadValueLiteral {
            column: "favorite_number".to_string(),
            expected: "integer".to_string(),
            literal: "abc".to_string(),
        };
        assert!(err.to_string().contains("abc"));
        assert!(err.to_string().contains("favorite_number"));
    }

    #[test]
    fn gator_result_ok() {
        let result: GatorResult<i32> = Ok(42);
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn gator_result_err() {
        let result: GatorResult<i32> = Err(GatorError::InvalidCondition);
        assert!(result.is_err());
    }
}
