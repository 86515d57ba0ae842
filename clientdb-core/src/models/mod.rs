//! Domain models with validation
//!
//! Newtypes validate on construction, so a value that exists is a value the
//! `client` table will accept.

mod client;
mod validation;

pub use client::{
    client_table, ClientEmail, ClientName, ClientRow, CLIENT_TABLE, MAX_EMAIL_LEN, MAX_NAME_LEN,
};
pub use validation::ValidationError;
