// SPDX-License-Identifier: MIT OR Apache-2.0

/// Registry configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub store: StoreConfig,
}

/// Connection settings of the SQLite publication store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_url: String,

    /// Every connection to `sqlite::memory:` opens its own empty database, keep this at 1 for
    /// in-memory stores.
    pub max_connections: u32,

    /// Create the database file if it doesn't exist yet.
    pub create_database: bool,

    /// Run the embedded schema migrations when connecting.
    pub run_migrations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            create_database: true,
            run_migrations: true,
        }
    }
}
