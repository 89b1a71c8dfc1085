//! Application state management.

use std::collections::HashMap;
use std::sync::Arc;

use crate::store::{SendStore, StoreError};

use super::config::Config;
use super::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Map of database name to store instance.
    databases: Arc<HashMap<String, SendStore>>,
}

impl AppState {
    /// Create a new AppState from configuration, creating missing stores.
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let mut databases = HashMap::new();

        for db_config in &config.databases {
            let path = std::path::Path::new(&db_config.path);
            let store = SendStore::open_or_init(path).map_err(|e| StateError {
                name: db_config.name.clone(),
                path: db_config.path.clone(),
                source: e,
            })?;
            databases.insert(db_config.name.clone(), store);
        }

        Ok(Self {
            databases: Arc::new(databases),
        })
    }

    /// Get a database by name.
    pub fn get_database(&self, name: &str) -> Result<&SendStore, ApiError> {
        self.databases
            .get(name)
            .ok_or_else(|| ApiError::database_not_found(name))
    }

    /// List all database names, sorted.
    pub fn database_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.databases.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// A configured store could not be opened or created.
#[derive(Debug)]
pub struct StateError {
    pub name: String,
    pub path: String,
    pub source: StoreError,
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to open database '{}' at '{}': {}",
            self.name, self.path, self.source
        )
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
