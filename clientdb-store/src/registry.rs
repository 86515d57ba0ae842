//! Registry of declared table schemas and their materialization.

use clientdb_core::{SchemaDrift, TableSchema};
use tracing::{debug, info, warn};

use crate::catalog;
use crate::error::{StoreError, StoreResult};
use crate::factory::ConnectionFactory;

/// Lifecycle of one registered schema. The transition is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Declared,
    Materialized,
}

#[derive(Debug, Clone)]
struct Entry {
    schema: TableSchema,
    state: SchemaState,
}

/// Declared tables, materialized in registration order
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: Vec<Entry>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table declaration.
    ///
    /// Re-registering a table name replaces the earlier declaration in place
    /// and resets it to [`SchemaState::Declared`].
    pub fn register_schema(&mut self, schema: TableSchema) {
        let entry = Entry {
            schema,
            state: SchemaState::Declared,
        };

        match self
            .entries
            .iter_mut()
            .find(|e| e.schema.name() == entry.schema.name())
        {
            Some(existing) => {
                warn!("replacing existing declaration for table '{}'", entry.schema.name());
                *existing = entry;
            }
            None => {
                debug!("registered table '{}'", entry.schema.name());
                self.entries.push(entry);
            }
        }
    }

    pub fn schemas(&self) -> impl Iterator<Item = &TableSchema> {
        self.entries.iter().map(|e| &e.schema)
    }

    pub fn state(&self, table: &str) -> Option<SchemaState> {
        self.entries
            .iter()
            .find(|e| e.schema.name() == table)
            .map(|e| e.state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Issue `CREATE TABLE IF NOT EXISTS` for every registered schema.
    ///
    /// Idempotent. Stops at the first table the database rejects; that table
    /// and any after it stay [`SchemaState::Declared`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::SchemaMaterialization`] when a definition is rejected
    /// - [`StoreError::Database`] when no connection can be acquired
    pub async fn materialize_schemas(&mut self, factory: &ConnectionFactory) -> StoreResult<()> {
        if self.entries.is_empty() {
            return Ok(());
        }

        let mut conn = factory.acquire().await?;
        for entry in &mut self.entries {
            let table = entry.schema.name().to_owned();
            let ddl = entry.schema.create_table_sql();
            debug!(%table, "{}", ddl);

            sqlx::query(&ddl)
                .execute(&mut *conn)
                .await
                .map_err(|source| StoreError::SchemaMaterialization {
                    table: table.clone(),
                    source,
                })?;

            if entry.state == SchemaState::Declared {
                info!("materialized table '{}'", table);
                entry.state = SchemaState::Materialized;
            }
        }

        Ok(())
    }

    /// Compare every registered schema with the live catalog.
    ///
    /// An empty result means the database matches the declarations.
    pub async fn verify_schemas(&self, factory: &ConnectionFactory) -> StoreResult<Vec<SchemaDrift>> {
        let mut conn = factory.acquire().await?;
        let mut drift = Vec::new();
        for entry in &self.entries {
            let columns = catalog::table_columns(&mut conn, entry.schema.name()).await?;
            drift.extend(entry.schema.diff_catalog(&columns));
        }

        if !drift.is_empty() {
            warn!("{} schema difference(s) found", drift.len());
        }
        Ok(drift)
    }
}
