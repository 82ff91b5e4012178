use std::{env, time::Duration};

use log::*;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/ledger.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Storage configuration for the ledger engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// How long a writer waits for the database write lock before giving up with a concurrency error.
    pub busy_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl LedgerConfig {
    pub fn new(database_url: &str) -> Self {
        Self { database_url: database_url.to_string(), ..Default::default() }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn from_env_or_default() -> Self {
        let database_url = env::var("LEDGER_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ LEDGER_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = env::var("LEDGER_DB_MAX_CONNECTIONS")
            .map(|s| {
                s.parse::<u32>().ok().filter(|n| *n > 0).unwrap_or_else(|| {
                    error!(
                        "🪛️ {s} is not a valid value for LEDGER_DB_MAX_CONNECTIONS. Using the default, \
                         {DEFAULT_MAX_CONNECTIONS}, instead."
                    );
                    DEFAULT_MAX_CONNECTIONS
                })
            })
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let busy_timeout = env::var("LEDGER_DB_BUSY_TIMEOUT_MS")
            .map(|s| {
                s.parse::<u64>().map(Duration::from_millis).unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid value for LEDGER_DB_BUSY_TIMEOUT_MS. {e} Using the default, {}ms, \
                         instead.",
                        DEFAULT_BUSY_TIMEOUT.as_millis()
                    );
                    DEFAULT_BUSY_TIMEOUT
                })
            })
            .unwrap_or(DEFAULT_BUSY_TIMEOUT);
        debug!("🪛️ Ledger database: {database_url} ({max_connections} connections)");
        Self { database_url, max_connections, busy_timeout }
    }
}
