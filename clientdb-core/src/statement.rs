//! CRUD statements against the `client` table.
//!
//! Each operation is one [`ClientStatement`] variant. Rendering produces
//! parameterized PostgreSQL; values are always bound, never spliced in.

use serde::Serialize;

use crate::error::StatementError;
use crate::models::{ClientEmail, ClientName, ClientRow, CLIENT_TABLE};
use crate::schema::quote_ident;

/// Row selector. Values are matched exactly as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFilter {
    All,
    Id(i32),
    Name(String),
    Email(String),
}

impl ClientFilter {
    fn render(&self, params: &mut Vec<SqlParam>) -> Option<String> {
        let (column, param) = match self {
            Self::All => return None,
            Self::Id(id) => ("id", SqlParam::Int(*id)),
            Self::Name(name) => ("name", SqlParam::Text(name.clone())),
            Self::Email(email) => ("email", SqlParam::Text(email.clone())),
        };
        params.push(param);
        Some(format!(" WHERE {} = ${}", quote_ident(column), params.len()))
    }
}

/// Fields to change in an update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientChanges {
    pub name: Option<ClientName>,
    pub email: Option<ClientEmail>,
}

impl ClientChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// One operation against the `client` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientStatement {
    Insert {
        name: ClientName,
        email: ClientEmail,
    },
    Select {
        filter: ClientFilter,
    },
    Update {
        id: i32,
        changes: ClientChanges,
    },
    Delete {
        filter: ClientFilter,
    },
}

/// Bound statement parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i32),
    Text(String),
}

/// Rendered SQL with its parameters in `$n` order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
    /// Whether the statement yields `client` rows rather than a row count
    pub returns_rows: bool,
}

/// Result of executing a [`ClientStatement`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StatementOutcome {
    Inserted(ClientRow),
    Rows(Vec<ClientRow>),
    Affected(u64),
}

const RETURNING: &str = " RETURNING \"id\", \"name\", \"email\"";

impl ClientStatement {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Select { .. } => "select",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    pub fn to_sql(&self) -> Result<SqlStatement, StatementError> {
        let table = quote_ident(CLIENT_TABLE);
        let mut params = Vec::new();

        let (sql, returns_rows) = match self {
            Self::Insert { name, email } => {
                params.push(SqlParam::Text(name.as_str().to_owned()));
                params.push(SqlParam::Text(email.as_str().to_owned()));
                (
                    format!(
                        "INSERT INTO {} (\"name\", \"email\") VALUES ($1, $2){}",
                        table, RETURNING
                    ),
                    true,
                )
            }
            Self::Select { filter } => {
                let filter = filter.render(&mut params).unwrap_or_default();
                (
                    format!(
                        "SELECT \"id\", \"name\", \"email\" FROM {}{} ORDER BY \"id\"",
                        table, filter
                    ),
                    true,
                )
            }
            Self::Update { id, changes } => {
                if changes.is_empty() {
                    return Err(StatementError::EmptyUpdate { id: *id });
                }

                let mut assignments = Vec::new();
                if let Some(name) = &changes.name {
                    params.push(SqlParam::Text(name.as_str().to_owned()));
                    assignments.push(format!("\"name\" = ${}", params.len()));
                }
                if let Some(email) = &changes.email {
                    params.push(SqlParam::Text(email.as_str().to_owned()));
                    assignments.push(format!("\"email\" = ${}", params.len()));
                }
                let filter = ClientFilter::Id(*id).render(&mut params).unwrap_or_default();
                (
                    format!("UPDATE {} SET {}{}", table, assignments.join(", "), filter),
                    false,
                )
            }
            Self::Delete { filter } => {
                let filter = filter
                    .render(&mut params)
                    .ok_or(StatementError::UnfilteredDelete)?;
                (format!("DELETE FROM {}{}", table, filter), false)
            }
        };

        Ok(SqlStatement {
            sql,
            params,
            returns_rows,
        })
    }
}
