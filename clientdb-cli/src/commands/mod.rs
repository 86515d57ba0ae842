//! Subcommand implementations

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use clientdb_core::{
    client_table, load_settings, ClientStatement, SchemaDrift, Settings, SettingsSource, StatementOutcome,
};
use clientdb_store::factory::{DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_CONNECTIONS};
use clientdb_store::{ClientRepo, ConnectionFactory, PoolConfig, SchemaRegistry};
use serde_json::json;
use tracing::info;

mod client;

pub use client::{DeleteArgs, InsertArgs, SelectArgs, UpdateArgs};

/// Options shared by every subcommand
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Env file read before the process environment (skipped if absent)
    #[arg(long, global = true, value_name = "PATH", default_value = ".env")]
    pub env_file: PathBuf,

    /// Maximum pooled database connections
    #[arg(
        long,
        global = true,
        env = "DB_MAX_CONNECTIONS",
        value_parser = clap::value_parser!(u32).range(1..),
        default_value_t = DEFAULT_MAX_CONNECTIONS
    )]
    pub max_connections: u32,

    /// Seconds to wait for a database connection
    #[arg(long, global = true, value_name = "SECS", default_value_t = DEFAULT_ACQUIRE_TIMEOUT.as_secs())]
    pub acquire_timeout: u64,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalArgs {
    fn settings(&self) -> Result<Settings> {
        let sources = [
            SettingsSource::EnvFile(self.env_file.clone()),
            SettingsSource::Environment,
        ];
        load_settings(&sources).context("failed to load database settings")
    }

    fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout),
        }
    }
}

/// Settings, factory and registry for one invocation, with `client` materialized
struct Bootstrap {
    factory: ConnectionFactory,
    registry: SchemaRegistry,
}

async fn bootstrap(global: &GlobalArgs) -> Result<Bootstrap> {
    let settings = global.settings()?;
    let factory = ConnectionFactory::with_pool_config(&settings, global.pool_config());

    let mut registry = SchemaRegistry::new();
    registry.register_schema(client_table());
    registry
        .materialize_schemas(&factory)
        .await
        .with_context(|| format!("failed to prepare schema on {}", factory.descriptor().redacted()))?;

    Ok(Bootstrap { factory, registry })
}

pub fn run_config(global: &GlobalArgs) -> Result<()> {
    let settings = global.settings()?;
    let factory = ConnectionFactory::with_pool_config(&settings, global.pool_config());
    let descriptor = factory.descriptor();

    if global.json {
        let out = json!({
            "connection": descriptor.redacted(),
            "host": descriptor.host(),
            "port": descriptor.port(),
            "user": descriptor.user(),
            "database": descriptor.database_name(),
            "max_connections": global.max_connections,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", descriptor.redacted());
    }
    Ok(())
}

pub async fn run_migrate(global: &GlobalArgs) -> Result<()> {
    let Bootstrap { factory, registry } = bootstrap(global).await?;
    let drift = registry.verify_schemas(&factory).await?;
    factory.close().await;

    if global.json {
        let tables: Vec<_> = registry.schemas().map(|s| s.name()).collect();
        let out = json!({ "tables": tables, "drift": drift });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in migrate_report(registry.schemas().map(|s| s.name()), &drift) {
            println!("{}", line);
        }
    }

    if !drift.is_empty() {
        bail!("{} schema difference(s) between declarations and database", drift.len());
    }
    Ok(())
}

/// Materialize `client`, then run one statement.
pub async fn run_statement(global: &GlobalArgs, statement: ClientStatement) -> Result<()> {
    let Bootstrap { factory, .. } = bootstrap(global).await?;

    let outcome = ClientRepo::new(&factory)
        .execute(&statement)
        .await
        .with_context(|| format!("{} failed", statement.kind()))?;
    factory.close().await;

    info!(kind = statement.kind(), "statement complete");
    print_outcome(&outcome, global.json)
}

/// One line per table: `ok` when clean, otherwise each of its drift entries
fn migrate_report<'a>(tables: impl Iterator<Item = &'a str>, drift: &[SchemaDrift]) -> Vec<String> {
    let mut lines = Vec::new();
    for table in tables {
        let mut clean = true;
        for d in drift.iter().filter(|d| d.table() == table) {
            lines.push(format!("drift: {}", d));
            clean = false;
        }
        if clean {
            lines.push(format!("{}: ok", table));
        }
    }
    lines
}

fn print_outcome(outcome: &StatementOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match outcome {
        StatementOutcome::Inserted(row) => {
            println!("inserted client {}: {} <{}>", row.id, row.name, row.email);
        }
        StatementOutcome::Rows(rows) if rows.is_empty() => println!("no matching clients"),
        StatementOutcome::Rows(rows) => {
            for row in rows {
                println!("{}\t{}\t{}", row.id, row.name, row.email);
            }
        }
        StatementOutcome::Affected(n) => println!("{} row(s) affected", n),
    }
    Ok(())
}
