//! clientdb CLI - settings-driven access to the `client` table
//!
//! Loads DB_* settings from an env file and the process environment,
//! materializes the `client` table, and runs one operation per invocation:
//! - `config`: show the resolved (redacted) connection
//! - `migrate`: create declared tables and check them against the catalog
//! - `insert` / `select` / `update` / `delete`: client CRUD

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{DeleteArgs, GlobalArgs, InsertArgs, SelectArgs, UpdateArgs};

#[derive(Parser, Debug)]
#[command(
    name = "clientdb",
    author,
    version,
    about = "Manage the client table of a PostgreSQL database configured from DB_* settings"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the resolved connection settings (password redacted)
    Config,
    /// Create declared tables if missing and report schema drift
    Migrate,
    /// Insert a client
    Insert(InsertArgs),
    /// List clients, optionally filtered
    Select(SelectArgs),
    /// Change a client's name and/or email
    Update(UpdateArgs),
    /// Delete clients matching a filter
    Delete(DeleteArgs),
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Config => commands::run_config(&cli.global)?,
        Commands::Migrate => commands::run_migrate(&cli.global).await?,
        Commands::Insert(args) => commands::run_statement(&cli.global, args.statement()?).await?,
        Commands::Select(args) => commands::run_statement(&cli.global, args.statement()?).await?,
        Commands::Update(args) => commands::run_statement(&cli.global, args.statement()?).await?,
        Commands::Delete(args) => commands::run_statement(&cli.global, args.statement()?).await?,
    }

    Ok(())
}
