//! Database configuration.

use serde::{Deserialize, Serialize};

/// SQLite storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
    /// How long a statement waits on a locked database, in seconds.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_seconds: u64,
    /// Insert sample brands and services on an empty database.
    #[serde(default)]
    pub seed_data: bool,
}

impl DatabaseConfig {
    /// Whether the database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_seconds: default_busy_timeout(),
            seed_data: false,
        }
    }
}

fn default_path() -> String {
    "data/bikeshop.db".to_string()
}

fn default_busy_timeout() -> u64 {
    5
}
