//! Live schema introspection via `information_schema`

use clientdb_core::CatalogColumn;
use sqlx::{PgConnection, Row};

/// Columns of `table` in the connection's current schema, in ordinal order.
///
/// Returns an empty list when the table does not exist.
pub async fn table_columns(
    conn: &mut PgConnection,
    table: &str,
) -> Result<Vec<CatalogColumn>, sqlx::Error> {
    // information_schema uses domain types; cast so sqlx decodes plain text/int4
    let rows = sqlx::query(
        r#"
        SELECT
            column_name::text AS column_name,
            data_type::text AS data_type,
            is_nullable::text AS is_nullable,
            character_maximum_length::int4 AS max_length
        FROM information_schema.columns
        WHERE table_schema = current_schema()
          AND table_name = $1
        ORDER BY ordinal_position
        "#,
    )
    .bind(table)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|r| {
            let is_nullable: String = r.try_get("is_nullable")?;
            let max_length: Option<i32> = r.try_get("max_length")?;
            Ok(CatalogColumn {
                name: r.try_get("column_name")?,
                data_type: r.try_get("data_type")?,
                is_nullable: is_nullable == "YES",
                max_length: max_length.map(i64::from),
            })
        })
        .collect()
}

/// Whether `table` exists in the connection's current schema.
pub async fn table_exists(conn: &mut PgConnection, table: &str) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = current_schema()
              AND table_name = $1
        )
        "#,
    )
    .bind(table)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.0)
}
