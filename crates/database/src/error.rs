use crate::search::SearchError;
use models::validation::ValidationError;
use sea_orm::DbErr;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors surfaced by repositories and services
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The requested row does not exist
    #[error("{0}")]
    NotFound(String),

    /// The row exists but is in a state that forbids the operation
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Db(#[from] DbErr),

    #[error("Search index error: {0}")]
    Search(#[from] SearchError),
}

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
