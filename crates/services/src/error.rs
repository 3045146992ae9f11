//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{GameId, SettingsError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `SessionController` and `SessionRunner`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session already started or destroyed")]
    NotIdle,
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Errors emitted by `GameRegistry`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("unknown game: {0}")]
    UnknownGame(GameId),
    #[error("duplicate game id: {0}")]
    Duplicate(GameId),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Errors emitted by `HighScoreService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HighScoreServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by score sync adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error("score sync is not configured")]
    Disabled,
    #[error("score sync request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid remote row: {0}")]
    InvalidRow(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    HighScores(#[from] HighScoreServiceError),
}
