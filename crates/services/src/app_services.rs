use std::sync::Arc;

use quiz_core::model::{GameResult, HighScores};
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::high_score_service::HighScoreService;
use crate::registry::GameRegistry;
use crate::sync::{ScoreSync, SyncService};

/// Outcome of storing a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedGame {
    pub is_new_high_score: bool,
    /// Best scores after local recording and any remote merge.
    pub high_scores: HighScores,
}

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    registry: Arc<GameRegistry>,
    high_scores: HighScoreService,
    sync: SyncService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or registry setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        remote: Option<Arc<dyn ScoreSync>>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, remote)
    }

    /// Build services over in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if registry setup fails.
    pub fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::from_storage(&Storage::in_memory(), clock, None)
    }

    /// # Errors
    ///
    /// Returns `AppServicesError` if registry setup fails.
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        remote: Option<Arc<dyn ScoreSync>>,
    ) -> Result<Self, AppServicesError> {
        let registry = Arc::new(GameRegistry::with_defaults()?);
        let high_scores = HighScoreService::new(clock, Arc::clone(&storage.high_scores));
        let sync = SyncService::new(high_scores.clone(), remote);
        Ok(Self {
            registry,
            high_scores,
            sync,
        })
    }

    #[must_use]
    pub fn registry(&self) -> Arc<GameRegistry> {
        Arc::clone(&self.registry)
    }

    #[must_use]
    pub fn high_scores(&self) -> &HighScoreService {
        &self.high_scores
    }

    #[must_use]
    pub fn sync(&self) -> &SyncService {
        &self.sync
    }

    /// Record `result` locally, then push it and merge remote bests if sync is on.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if local storage fails. Sync problems are only logged.
    pub async fn record_game(&self, result: &GameResult) -> Result<RecordedGame, AppServicesError> {
        let is_new_high_score = self.high_scores.record_result(result).await?;
        let high_scores = match self.sync.after_game(result).await {
            Some(merged) => merged,
            None => self.high_scores.all().await?,
        };
        Ok(RecordedGame {
            is_new_high_score,
            high_scores,
        })
    }

    /// Current best scores, refreshed from the remote when sync is on.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if local storage fails.
    pub async fn load_high_scores(&self) -> Result<HighScores, AppServicesError> {
        match self.sync.pull().await {
            Some(merged) => Ok(merged),
            None => Ok(self.high_scores.all().await?),
        }
    }
}
