//! Database-backed tests.
//!
//! Run with the DB_* variables (or a .env file) pointing at a scratch database:
//! cargo test -p clientdb-store -- --ignored

use std::time::{SystemTime, UNIX_EPOCH};

use clientdb_core::{
    client_table, default_sources, load_settings, ClientChanges, ClientEmail, ClientFilter,
    ClientName, ColumnDef, ColumnType, StatementOutcome, TableSchema,
};
use clientdb_store::{
    build_connection_factory, catalog, ClientRepo, ConnectionFactory, SchemaRegistry, SchemaState,
    StoreError,
};

fn factory() -> ConnectionFactory {
    let settings = load_settings(&default_sources()).expect("DB_* settings required");
    build_connection_factory(&settings)
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("{}{}{}", prefix, std::process::id(), nanos)
}

#[tokio::test]
#[ignore = "requires database"]
async fn client_table_materializes_with_declared_columns() {
    let factory = factory();
    let mut registry = SchemaRegistry::new();
    registry.register_schema(client_table());

    registry.materialize_schemas(&factory).await.expect("first materialize");
    registry
        .materialize_schemas(&factory)
        .await
        .expect("second materialize must be a no-op");
    assert_eq!(registry.state("client"), Some(SchemaState::Materialized));

    let mut conn = factory.acquire().await.unwrap();
    assert!(catalog::table_exists(&mut conn, "client").await.unwrap());

    let columns = catalog::table_columns(&mut conn, "client").await.unwrap();
    let summary: Vec<_> = columns
        .iter()
        .map(|c| (c.name.as_str(), c.data_type.as_str(), c.is_nullable, c.max_length))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("id", "integer", false, None),
            ("name", "character varying", false, Some(50)),
            ("email", "character varying", false, Some(100)),
        ]
    );

    assert!(registry.verify_schemas(&factory).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn rejected_definition_is_reported_and_later_tables_stay_declared() {
    let factory = factory();
    let table = unique("clientdb_bad_");
    // PostgreSQL caps VARCHAR length at 10485760
    let mut registry = SchemaRegistry::new();
    registry.register_schema(
        TableSchema::builder(table)
            .column(ColumnDef::new("id", ColumnType::Integer).primary_key())
            .column(ColumnDef::new("blob", ColumnType::Varchar(20_000_000)))
            .build()
            .unwrap(),
    );
    registry.register_schema(client_table());

    let err = registry.materialize_schemas(&factory).await.unwrap_err();
    assert!(matches!(err, StoreError::SchemaMaterialization { .. }));
    assert_eq!(registry.state("client"), Some(SchemaState::Declared));
}

#[tokio::test]
#[ignore = "requires database"]
async fn crud_round_trip() {
    let factory = factory();
    let mut registry = SchemaRegistry::new();
    registry.register_schema(client_table());
    registry.materialize_schemas(&factory).await.unwrap();

    let repo = ClientRepo::new(&factory);
    let name = unique("mary");
    let email = format!("{}@mail.com", name);

    let inserted = match repo
        .insert(ClientName::new(&name).unwrap(), ClientEmail::new(&email).unwrap())
        .await
        .unwrap()
    {
        StatementOutcome::Inserted(row) => row,
        other => panic!("expected Inserted, got {:?}", other),
    };
    assert_eq!(inserted.name, name);

    match repo
        .select(ClientFilter::Name(name.clone()))
        .await
        .unwrap()
    {
        StatementOutcome::Rows(rows) => assert_eq!(rows, vec![inserted.clone()]),
        other => panic!("expected Rows, got {:?}", other),
    }

    let renamed = unique("james");
    let changes = ClientChanges {
        name: Some(ClientName::new(&renamed).unwrap()),
        email: None,
    };
    assert_eq!(
        repo.update(inserted.id, changes).await.unwrap(),
        StatementOutcome::Affected(1)
    );

    assert_eq!(
        repo.delete(ClientFilter::Id(inserted.id)).await.unwrap(),
        StatementOutcome::Affected(1)
    );
    assert_eq!(
        repo.delete(ClientFilter::Id(inserted.id)).await.unwrap(),
        StatementOutcome::Affected(0)
    );
}
