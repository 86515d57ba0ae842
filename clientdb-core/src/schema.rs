//! Declarative table schemas.
//!
//! A [`TableSchema`] is built once through [`TableSchemaBuilder`], which
//! enforces the invariants below, and is then rendered to PostgreSQL DDL or
//! compared against rows read from `information_schema.columns`.
//!
//! - column names unique and non-empty
//! - at least one primary key column (several form a composite key)
//! - primary key columns are `NOT NULL`
//! - auto-increment only on an integer primary key

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::SchemaDefinitionError;

/// Semantic column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Integer,
    BigInt,
    Varchar(u32),
    Text,
    Boolean,
    TimestampTz,
}

impl ColumnType {
    /// PostgreSQL DDL spelling
    pub fn sql_type(self) -> String {
        match self {
            Self::Integer => "INTEGER".to_string(),
            Self::BigInt => "BIGINT".to_string(),
            Self::Varchar(len) => format!("VARCHAR({})", len),
            Self::Text => "TEXT".to_string(),
            Self::Boolean => "BOOLEAN".to_string(),
            Self::TimestampTz => "TIMESTAMPTZ".to_string(),
        }
    }

    /// `information_schema.columns.data_type` spelling
    pub fn catalog_name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::BigInt => "bigint",
            Self::Varchar(_) => "character varying",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::TimestampTz => "timestamp with time zone",
        }
    }

    pub fn max_length(self) -> Option<u32> {
        match self {
            Self::Varchar(len) => Some(len),
            _ => None,
        }
    }

    fn is_integer(self) -> bool {
        matches!(self, Self::Integer | Self::BigInt)
    }

    fn serial_type(self) -> Option<&'static str> {
        match self {
            Self::Integer => Some("SERIAL"),
            Self::BigInt => Some("BIGSERIAL"),
            _ => None,
        }
    }
}

/// One column declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
}

impl ColumnDef {
    /// A nullable, non-key column.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            primary_key: false,
            auto_increment: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark as (part of) the primary key. Implies `NOT NULL`.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    fn ddl(&self) -> String {
        let ty = match (self.auto_increment, self.column_type.serial_type()) {
            (true, Some(serial)) => serial.to_string(),
            _ => self.column_type.sql_type(),
        };
        let null = if self.nullable { "NULL" } else { "NOT NULL" };
        format!("{} {} {}", quote_ident(&self.name), ty, null)
    }
}

/// Declarative description of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn builder(name: impl Into<String>) -> TableSchemaBuilder {
        TableSchemaBuilder {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this table.
    pub fn create_table_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(ColumnDef::ddl).collect();
        let pk: Vec<String> = self.primary_key().map(|c| quote_ident(&c.name)).collect();
        parts.push(format!("PRIMARY KEY ({})", pk.join(", ")));

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(&self.name),
            parts.join(", ")
        )
    }

    /// Compare this declaration against live catalog rows for the same table.
    ///
    /// An empty `catalog` means the table does not exist.
    pub fn diff_catalog(&self, catalog: &[CatalogColumn]) -> Vec<SchemaDrift> {
        if catalog.is_empty() {
            return vec![SchemaDrift::MissingTable {
                table: self.name.clone(),
            }];
        }

        let mut drift = Vec::new();
        for declared in &self.columns {
            let Some(live) = catalog.iter().find(|c| c.name == declared.name) else {
                drift.push(SchemaDrift::MissingColumn {
                    table: self.name.clone(),
                    column: declared.name.clone(),
                });
                continue;
            };

            let expected = declared.column_type.catalog_name();
            let length_differs = declared.column_type.max_length().map(i64::from) != live.max_length;
            if live.data_type != expected || length_differs {
                drift.push(SchemaDrift::TypeMismatch {
                    table: self.name.clone(),
                    column: declared.name.clone(),
                    declared: declared.column_type.sql_type(),
                    actual: live.describe_type(),
                });
            }
            if live.is_nullable != declared.nullable {
                drift.push(SchemaDrift::NullabilityMismatch {
                    table: self.name.clone(),
                    column: declared.name.clone(),
                    declared_nullable: declared.nullable,
                });
            }
        }

        for live in catalog {
            if self.column(&live.name).is_none() {
                drift.push(SchemaDrift::ExtraColumn {
                    table: self.name.clone(),
                    column: live.name.clone(),
                });
            }
        }

        drift
    }
}

/// Collects columns and validates them on [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct TableSchemaBuilder {
    name: String,
    columns: Vec<ColumnDef>,
}

impl TableSchemaBuilder {
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn build(self) -> Result<TableSchema, SchemaDefinitionError> {
        let table = self.name;
        if table.trim().is_empty() {
            return Err(SchemaDefinitionError::EmptyTableName);
        }
        if self.columns.is_empty() {
            return Err(SchemaDefinitionError::NoColumns { table });
        }

        let mut seen = HashSet::new();
        for col in &self.columns {
            if col.name.trim().is_empty() {
                return Err(SchemaDefinitionError::EmptyColumnName { table });
            }
            if !seen.insert(col.name.as_str()) {
                return Err(SchemaDefinitionError::DuplicateColumn {
                    table: table.clone(),
                    column: col.name.clone(),
                });
            }
            if col.primary_key && col.nullable {
                return Err(SchemaDefinitionError::NullablePrimaryKey {
                    table: table.clone(),
                    column: col.name.clone(),
                });
            }
            if col.auto_increment && !(col.primary_key && col.column_type.is_integer()) {
                return Err(SchemaDefinitionError::InvalidAutoIncrement {
                    table: table.clone(),
                    column: col.name.clone(),
                });
            }
            if col.column_type == ColumnType::Varchar(0) {
                return Err(SchemaDefinitionError::ZeroLengthVarchar {
                    table: table.clone(),
                    column: col.name.clone(),
                });
            }
        }

        if !self.columns.iter().any(|c| c.primary_key) {
            return Err(SchemaDefinitionError::MissingPrimaryKey { table });
        }

        Ok(TableSchema {
            name: table,
            columns: self.columns,
        })
    }
}

/// One row of `information_schema.columns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogColumn {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub max_length: Option<i64>,
}

impl CatalogColumn {
    fn describe_type(&self) -> String {
        match self.max_length {
            Some(len) => format!("{}({})", self.data_type, len),
            None => self.data_type.clone(),
        }
    }
}

/// A difference between a declared table and the live database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaDrift {
    MissingTable {
        table: String,
    },
    MissingColumn {
        table: String,
        column: String,
    },
    ExtraColumn {
        table: String,
        column: String,
    },
    TypeMismatch {
        table: String,
        column: String,
        declared: String,
        actual: String,
    },
    NullabilityMismatch {
        table: String,
        column: String,
        declared_nullable: bool,
    },
}

impl SchemaDrift {
    /// Table the difference was found in
    pub fn table(&self) -> &str {
        match self {
            Self::MissingTable { table }
            | Self::MissingColumn { table, .. }
            | Self::ExtraColumn { table, .. }
            | Self::TypeMismatch { table, .. }
            | Self::NullabilityMismatch { table, .. } => table,
        }
    }
}

impl fmt::Display for SchemaDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTable { table } => write!(f, "table '{}' does not exist", table),
            Self::MissingColumn { table, column } => {
                write!(f, "column '{}.{}' is missing", table, column)
            }
            Self::ExtraColumn { table, column } => {
                write!(f, "column '{}.{}' is not declared", table, column)
            }
            Self::TypeMismatch {
                table,
                column,
                declared,
                actual,
            } => write!(
                f,
                "column '{}.{}' declared {} but is {}",
                table, column, declared, actual
            ),
            Self::NullabilityMismatch {
                table,
                column,
                declared_nullable,
            } => {
                let (want, got) = if *declared_nullable {
                    ("NULL", "NOT NULL")
                } else {
                    ("NOT NULL", "NULL")
                };
                write!(f, "column '{}.{}' declared {} but is {}", table, column, want, got)
            }
        }
    }
}

/// Double-quote a PostgreSQL identifier, escaping embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
