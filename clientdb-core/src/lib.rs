//! clientdb-core: settings, connection descriptors and table declarations
//!
//! Everything here is driver-independent. `clientdb-store` turns these
//! values into live PostgreSQL connections and DDL/DML execution.

pub mod descriptor;
pub mod error;
pub mod models;
pub mod schema;
pub mod settings;
pub mod statement;

pub use descriptor::ConnectionDescriptor;
pub use error::{ConfigurationError, SchemaDefinitionError, StatementError};
pub use models::{client_table, ClientEmail, ClientName, ClientRow, ValidationError};
pub use schema::{CatalogColumn, ColumnDef, ColumnType, SchemaDrift, TableSchema};
pub use settings::{default_sources, load_settings, Settings, SettingsSource};
pub use statement::{
    ClientChanges, ClientFilter, ClientStatement, SqlParam, SqlStatement, StatementOutcome,
};
