use std::collections::HashMap;
use thiserror::Error;

/// Path that selects an in-memory database instead of a file.
pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: String,
    pub busy_timeout_ms: u64,
    pub foreign_keys: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: "questions.db".to_string(),
            busy_timeout_ms: 5000,
            foreign_keys: true,
        }
    }
}

impl Config {
    /// Config for a private in-memory database.
    pub fn in_memory() -> Self {
        Config {
            database_path: IN_MEMORY_PATH.to_string(),
            ..Config::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_PATH
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let database_path = env_map
            .get("DATABASE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.database_path);

        let busy_timeout_ms = match env_map.get("DATABASE_BUSY_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "DATABASE_BUSY_TIMEOUT_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?,
            None => defaults.busy_timeout_ms,
        };

        let foreign_keys = match env_map
            .get("DATABASE_FOREIGN_KEYS")
            .map(|s| s.trim().to_ascii_lowercase())
        {
            None => defaults.foreign_keys,
            Some(value) => match value.as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => {
                    return Err(ConfigError::InvalidValue(
                        "DATABASE_FOREIGN_KEYS".to_string(),
                        format!("must be true, false, 1, or 0, got {}", other),
                    ))
                }
            },
        };

        Ok(Config {
            database_path,
            busy_timeout_ms,
            foreign_keys,
        })
    }
}
