//! The `client` table and its field types

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::schema::{ColumnDef, ColumnType, TableSchema};

pub const CLIENT_TABLE: &str = "client";

/// Maximum length for client names, matches `VARCHAR(50)`
pub const MAX_NAME_LEN: usize = 50;

/// Maximum length for client emails, matches `VARCHAR(100)`
pub const MAX_EMAIL_LEN: usize = 100;

static CLIENT_SCHEMA: Lazy<TableSchema> = Lazy::new(|| {
    TableSchema::builder(CLIENT_TABLE)
        .column(
            ColumnDef::new("id", ColumnType::Integer)
                .primary_key()
                .auto_increment(),
        )
        .column(ColumnDef::new("name", ColumnType::Varchar(MAX_NAME_LEN as u32)).not_null())
        .column(ColumnDef::new("email", ColumnType::Varchar(MAX_EMAIL_LEN as u32)).not_null())
        .build()
        .expect("invalid client table declaration")
});

/// Declaration of the `client` table.
pub fn client_table() -> TableSchema {
    CLIENT_SCHEMA.clone()
}

/// Client name that fits the `name` column.
///
/// Stored exactly as given; only the `VARCHAR(50)` limit is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientName(String);

impl ClientName {
    /// # Example
    /// ```
    /// use clientdb_core::models::ClientName;
    ///
    /// assert_eq!(ClientName::new(" Mary").unwrap().as_str(), " Mary");
    /// assert!(ClientName::new(&"x".repeat(51)).is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        check_len(s, "client name", MAX_NAME_LEN)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ClientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Client email that fits the `email` column.
///
/// Stored exactly as given; only the `VARCHAR(100)` limit is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientEmail(String);

impl ClientEmail {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        check_len(s, "email", MAX_EMAIL_LEN)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ClientEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// VARCHAR(n) counts characters, not bytes
fn check_len(s: &str, field: &'static str, max: usize) -> Result<(), ValidationError> {
    if s.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// One row of the `client` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRow {
    pub id: i32,
    pub name: String,
    pub email: String,
}
