//! clientdb-store: PostgreSQL side of clientdb
//!
//! Turns [`Settings`](clientdb_core::Settings) into a lazily-connecting
//! [`ConnectionFactory`], materializes registered table schemas, and runs
//! client statements.
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default), opened on first use
//! - Scoped connections: released when the guard drops
//! - One transaction per statement
//! - Schema creation is `IF NOT EXISTS`, safe to repeat

pub mod catalog;
pub mod error;
pub mod factory;
pub mod registry;
pub mod repo;

pub use error::{StoreError, StoreResult};
pub use factory::{build_connection_factory, ConnectionFactory, PoolConfig};
pub use registry::{SchemaRegistry, SchemaState};
pub use repo::ClientRepo;
