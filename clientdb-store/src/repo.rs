//! Client repository
//!
//! Every [`ClientStatement`] runs through [`ClientRepo::execute`], inside its
//! own transaction, committed before the outcome is returned.

use clientdb_core::{
    ClientChanges, ClientEmail, ClientFilter, ClientName, ClientRow, ClientStatement, SqlParam,
    StatementOutcome,
};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use tracing::debug;

use crate::error::StoreResult;
use crate::factory::ConnectionFactory;

/// Client repository
pub struct ClientRepo<'a> {
    factory: &'a ConnectionFactory,
}

impl<'a> ClientRepo<'a> {
    pub fn new(factory: &'a ConnectionFactory) -> Self {
        Self { factory }
    }

    /// Run one statement and commit.
    pub async fn execute(&self, statement: &ClientStatement) -> StoreResult<StatementOutcome> {
        let rendered = statement.to_sql()?;
        debug!(kind = statement.kind(), "{}", rendered.sql);

        let mut tx = self.factory.begin().await?;
        let query = bind_params(sqlx::query(&rendered.sql), &rendered.params);

        let outcome = if rendered.returns_rows {
            let rows = query
                .fetch_all(&mut *tx)
                .await?
                .iter()
                .map(client_row)
                .collect::<Result<Vec<_>, _>>()?;

            match statement {
                ClientStatement::Insert { .. } => {
                    let row = rows.into_iter().next().ok_or(sqlx::Error::RowNotFound)?;
                    StatementOutcome::Inserted(row)
                }
                _ => StatementOutcome::Rows(rows),
            }
        } else {
            let result = query.execute(&mut *tx).await?;
            StatementOutcome::Affected(result.rows_affected())
        };

        tx.commit().await?;
        Ok(outcome)
    }

    pub async fn insert(&self, name: ClientName, email: ClientEmail) -> StoreResult<StatementOutcome> {
        self.execute(&ClientStatement::Insert { name, email }).await
    }

    pub async fn select(&self, filter: ClientFilter) -> StoreResult<StatementOutcome> {
        self.execute(&ClientStatement::Select { filter }).await
    }

    pub async fn update(&self, id: i32, changes: ClientChanges) -> StoreResult<StatementOutcome> {
        self.execute(&ClientStatement::Update { id, changes }).await
    }

    pub async fn delete(&self, filter: ClientFilter) -> StoreResult<StatementOutcome> {
        self.execute(&ClientStatement::Delete { filter }).await
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [SqlParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Text(s) => query.bind(s.as_str()),
        };
    }
    query
}

fn client_row(row: &PgRow) -> Result<ClientRow, sqlx::Error> {
    Ok(ClientRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}
