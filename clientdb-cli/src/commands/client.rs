//! Client CRUD arguments

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use clientdb_core::{ClientChanges, ClientEmail, ClientFilter, ClientName, ClientStatement};

#[derive(Args, Debug)]
pub struct InsertArgs {
    /// Client name (max 50 characters)
    #[arg(long)]
    pub name: String,

    /// Client email (max 100 characters)
    #[arg(long)]
    pub email: String,
}

impl InsertArgs {
    pub fn statement(&self) -> Result<ClientStatement> {
        Ok(ClientStatement::Insert {
            name: ClientName::new(&self.name).context("invalid --name")?,
            email: ClientEmail::new(&self.email).context("invalid --email")?,
        })
    }
}

/// At most one of --id/--name/--email
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("filter").args(["id", "name", "email"]).multiple(false)))]
pub struct SelectArgs {
    /// Match by id
    #[arg(long)]
    pub id: Option<i32>,

    /// Match by exact name
    #[arg(long)]
    pub name: Option<String>,

    /// Match by exact email
    #[arg(long)]
    pub email: Option<String>,
}

impl SelectArgs {
    pub fn statement(&self) -> Result<ClientStatement> {
        Ok(ClientStatement::Select {
            filter: filter(self.id, self.name.as_deref(), self.email.as_deref()),
        })
    }
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("changes").args(["name", "email"]).required(true).multiple(true)))]
pub struct UpdateArgs {
    /// Id of the client to change
    #[arg(long)]
    pub id: i32,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New email
    #[arg(long)]
    pub email: Option<String>,
}

impl UpdateArgs {
    pub fn statement(&self) -> Result<ClientStatement> {
        let changes = ClientChanges {
            name: self
                .name
                .as_deref()
                .map(ClientName::new)
                .transpose()
                .context("invalid --name")?,
            email: self
                .email
                .as_deref()
                .map(ClientEmail::new)
                .transpose()
                .context("invalid --email")?,
        };
        Ok(ClientStatement::Update { id: self.id, changes })
    }
}

/// Exactly one of --id/--name/--email
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("filter").args(["id", "name", "email"]).required(true).multiple(false)))]
pub struct DeleteArgs {
    /// Delete by id
    #[arg(long)]
    pub id: Option<i32>,

    /// Delete every client with this exact name
    #[arg(long)]
    pub name: Option<String>,

    /// Delete every client with this exact email
    #[arg(long)]
    pub email: Option<String>,
}

impl DeleteArgs {
    pub fn statement(&self) -> Result<ClientStatement> {
        Ok(ClientStatement::Delete {
            filter: filter(self.id, self.name.as_deref(), self.email.as_deref()),
        })
    }
}

fn filter(id: Option<i32>, name: Option<&str>, email: Option<&str>) -> ClientFilter {
    match (id, name, email) {
        (Some(id), _, _) => ClientFilter::Id(id),
        (_, Some(name), _) => ClientFilter::Name(name.to_owned()),
        (_, _, Some(email)) => ClientFilter::Email(email.to_owned()),
        _ => ClientFilter::All,
    }
}
