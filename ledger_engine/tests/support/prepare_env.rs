use std::env;

use ledger_common::helpers::parse_boolean_flag;
use ledger_engine::{LedgerConfig, LedgerDatabase, SqliteDatabase};
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub fn init_logging() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
}

pub fn random_db_path() -> String {
    let dir = env::temp_dir();
    format!("sqlite://{}/ledger_test_{}.db", dir.display(), rand::random::<u64>())
}

/// Creates a fresh, migrated database at `url`. Any existing database at that location is dropped first.
pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    init_logging();
    if Sqlite::database_exists(url).await.unwrap_or(false) {
        Sqlite::drop_database(url).await.expect("Error dropping database");
    }
    let config = LedgerConfig::new(url).with_max_connections(5);
    let db = SqliteDatabase::new_with_config(&config).await.expect("Error creating database");
    debug!("🚀️ Created test database {url}");
    db
}

/// Closes the pool and deletes the database file, unless `LEDGER_KEEP_TEST_DB` is set.
pub async fn tear_down_db(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    if parse_boolean_flag(env::var("LEDGER_KEEP_TEST_DB").ok(), false) {
        info!("🚀️ Keeping test database {url}");
        return;
    }
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Could not remove test database {url}: {e}");
    }
}
