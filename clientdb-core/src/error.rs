//! Structured error types for clientdb-core.
//!
//! Library errors are `thiserror` enums so callers can match on them.
//! The `clientdb` binary wraps them with `anyhow` context.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ValidationError;

/// Settings could not be assembled from the configured sources.
///
/// Always fatal: nothing downstream runs without valid settings.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// One or more required keys were absent from every source
    #[error("missing required setting(s): {}", keys.join(", "))]
    Missing { keys: Vec<&'static str> },

    /// A value was present but could not be coerced to its declared kind
    #[error("invalid value for {key}: '{value}' is not a valid {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    /// An env file exists but could not be read or parsed
    #[error("failed to read env file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
}

impl ConfigurationError {
    pub fn invalid_value(key: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
            expected,
        }
    }

    pub fn env_file(path: impl Into<PathBuf>, source: dotenvy::Error) -> Self {
        Self::EnvFile {
            path: path.into(),
            source,
        }
    }
}

/// A table declaration violates one of the schema invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaDefinitionError {
    #[error("table name cannot be empty")]
    EmptyTableName,

    #[error("table '{table}' declares no columns")]
    NoColumns { table: String },

    #[error("table '{table}' has a column with an empty name")]
    EmptyColumnName { table: String },

    #[error("table '{table}' declares column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("table '{table}' has no primary key column")]
    MissingPrimaryKey { table: String },

    #[error("primary key column '{table}.{column}' cannot be nullable")]
    NullablePrimaryKey { table: String, column: String },

    #[error("column '{table}.{column}' is auto-increment but is not an integer primary key")]
    InvalidAutoIncrement { table: String, column: String },

    #[error("column '{table}.{column}' declares VARCHAR with zero length")]
    ZeroLengthVarchar { table: String, column: String },
}

/// A CRUD statement cannot be rendered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error("update of client {id} sets no fields")]
    EmptyUpdate { id: i32 },

    #[error("refusing to delete without a filter")]
    UnfilteredDelete,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lists_every_key() {
        let err = ConfigurationError::Missing {
            keys: vec!["DB_HOST", "DB_PORT"],
        };
        assert_eq!(err.to_string(), "missing required setting(s): DB_HOST, DB_PORT");
    }

    #[test]
    fn invalid_value_display() {
        let err = ConfigurationError::invalid_value("DB_PORT", "abc", "integer");
        assert_eq!(
            err.to_string(),
            "invalid value for DB_PORT: 'abc' is not a valid integer"
        );
    }

    #[test]
    fn schema_error_names_table_and_column() {
        let err = SchemaDefinitionError::DuplicateColumn {
            table: "client".into(),
            column: "email".into(),
        };
        assert!(err.to_string().contains("client"));
        assert!(err.to_string().contains("email"));
    }
}
