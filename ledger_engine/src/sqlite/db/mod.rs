//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interaction are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or pass `&mut *tx` from an open
//! transaction when several calls have to succeed or fail together.
use std::str::FromStr;

use log::*;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

use crate::config::LedgerConfig;

pub mod directory;
pub mod documents;
pub mod ledger;
pub mod orders;

/// Opens a pool against `config.database_url`, creating the database file if it does not exist.
///
/// Every connection enforces foreign keys (cascading deletes depend on it) and waits up to `config.busy_timeout`
/// for the write lock before failing with `SQLITE_BUSY`.
pub async fn new_pool(config: &LedgerConfig) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout);
    let pool = SqlitePoolOptions::new().max_connections(config.max_connections).connect_with(options).await?;
    debug!(
        "🗃️ Connected to {} (max {} connections, busy timeout {}ms)",
        config.database_url,
        config.max_connections,
        config.busy_timeout.as_millis()
    );
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqlxError> {
    sqlx::migrate!("./src/sqlite/migrations").run(pool).await?;
    info!("🗃️ Database migrations applied");
    Ok(())
}
