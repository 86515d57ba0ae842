//! Error types for clientdb-store

use clientdb_core::StatementError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The database rejected a table definition. Not retried.
    #[error("failed to materialize table '{table}': {source}")]
    SchemaMaterialization {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    /// Connection, authentication and query failures, passed through as-is
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Statement(#[from] StatementError),
}
