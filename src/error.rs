use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuestionsError {
    #[error("{entity} already in database with id {id}")]
    AlreadyPersisted { entity: &'static str, id: i64 },
    #[error("{entity} not in database")]
    NotPersisted { entity: &'static str },
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl QuestionsError {
    pub(crate) fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        QuestionsError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// True for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, QuestionsError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, QuestionsError>;
