use async_trait::async_trait;
use quiz_core::model::{GameId, HighScore, HighScores};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for locally persisted best scores.
#[async_trait]
pub trait HighScoreRepository: Send + Sync {
    /// Fetch the stored best for a game, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_high_score(&self, game_id: &GameId) -> Result<Option<HighScore>, StorageError>;

    /// Fetch every stored best, keyed by game.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_high_scores(&self) -> Result<HighScores, StorageError>;

    /// Insert or replace the best for a game. No comparison happens here.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the score cannot be stored.
    async fn put_high_score(
        &self,
        game_id: &GameId,
        score: &HighScore,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    high_scores: Arc<Mutex<HighScores>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HighScoreRepository for InMemoryRepository {
    async fn get_high_score(&self, game_id: &GameId) -> Result<Option<HighScore>, StorageError> {
        let guard = self
            .high_scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(game_id).cloned())
    }

    async fn list_high_scores(&self) -> Result<HighScores, StorageError> {
        let guard = self
            .high_scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn put_high_score(
        &self,
        game_id: &GameId,
        score: &HighScore,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .high_scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(game_id.clone(), score.clone());
        Ok(())
    }
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub high_scores: Arc<dyn HighScoreRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let high_scores: Arc<dyn HighScoreRepository> = Arc::new(InMemoryRepository::new());
        Self { high_scores }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn put_replaces_existing_entry() {
        let repo = InMemoryRepository::new();
        let game = GameId::from("speed-maths");
        assert!(repo.get_high_score(&game).await.unwrap().is_none());

        repo.put_high_score(&game, &HighScore::new(10, 20, fixed_now()))
            .await
            .unwrap();
        repo.put_high_score(&game, &HighScore::new(4, 20, fixed_now()))
            .await
            .unwrap();

        let stored = repo.get_high_score(&game).await.unwrap().unwrap();
        assert_eq!(stored.score, 4);
        assert_eq!(repo.list_high_scores().await.unwrap().len(), 1);
    }
}
