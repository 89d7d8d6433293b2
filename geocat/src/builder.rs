// SPDX-License-Identifier: MIT OR Apache-2.0

use geocat_store::sqlite::{SqliteError, SqliteStore, SqliteStoreBuilder};

use crate::config::Config;
use crate::registry::Registry;

/// Builds a registry backed by an SQLite database.
///
/// The same store answers identity lookups, users and workspaces are kept in the database next to
/// the publications.
#[derive(Clone, Debug)]
pub struct RegistryBuilder {
    config: Config,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn database_url(mut self, url: &str) -> Self {
        self.config.store.database_url = url.to_string();
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.config.store.max_connections = max_connections;
        self
    }

    pub fn create_database(mut self, create_database: bool) -> Self {
        self.config.store.create_database = create_database;
        self
    }

    pub fn run_migrations(mut self, run_migrations: bool) -> Self {
        self.config.store.run_migrations = run_migrations;
        self
    }

    pub async fn build(
        self,
    ) -> Result<Registry<SqliteStore<'static>, SqliteStore<'static>>, SqliteError> {
        let store = SqliteStoreBuilder::new()
            .database_url(&self.config.store.database_url)
            .max_connections(self.config.store.max_connections)
            .create_database(self.config.store.create_database)
            .run_default_migrations(self.config.store.run_migrations)
            .build()
            .await?;

        Ok(Registry::new(store.clone(), store))
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
