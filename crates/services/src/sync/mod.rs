//! Optional upload of results to a remote score store.
//!
//! The local high-score table is authoritative for play; sync only adds to it.
//! Every remote failure is logged and dropped so a flaky network never blocks
//! or corrupts local state.

mod http;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{GameId, GameResult, HighScore, HighScores, ScoreSubmission};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SyncError;
use crate::high_score_service::HighScoreService;

pub use http::{HttpScoreSync, SyncConfig};

/// Remote store for finished games, scoped to one player.
#[async_trait]
pub trait ScoreSync: Send + Sync {
    /// Append one finished game.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` if the remote rejects or cannot be reached.
    async fn push_result(&self, submission: &ScoreSubmission) -> Result<(), SyncError>;

    /// Best score per game across everything pushed so far.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` if the remote rejects or cannot be reached.
    async fn fetch_high_scores(&self) -> Result<HighScores, SyncError>;
}

/// One stored game as returned by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteScoreRow {
    pub game_name: String,
    pub score: u32,
    pub total: u32,
    #[serde(default)]
    pub percentage: u8,
    pub created_at: DateTime<Utc>,
}

impl RemoteScoreRow {
    /// # Errors
    ///
    /// Returns `SyncError::InvalidRow` when the score exceeds the total or the
    /// percentage is out of range.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.score > self.total {
            return Err(SyncError::InvalidRow(format!(
                "{}: score {} exceeds total {}",
                self.game_name, self.score, self.total
            )));
        }
        if self.percentage > 100 {
            return Err(SyncError::InvalidRow(format!(
                "{}: percentage {} above 100",
                self.game_name, self.percentage
            )));
        }
        Ok(())
    }
}

/// Collapse raw rows to the highest score per game. On ties the first row wins.
///
/// # Errors
///
/// Returns `SyncError::InvalidRow` for the first row that fails validation.
pub fn best_per_game(
    rows: impl IntoIterator<Item = RemoteScoreRow>,
) -> Result<HighScores, SyncError> {
    let mut best = HighScores::new();
    for row in rows {
        row.validate()?;
        let game_id = GameId::new(row.game_name);
        if best.is_improvement(&game_id, row.score) {
            best.insert(game_id, HighScore::new(row.score, row.total, row.created_at));
        }
    }
    Ok(best)
}

//
// ─── SYNC SERVICE ──────────────────────────────────────────────────────────────
//

/// Pushes results and folds remote bests into local storage.
#[derive(Clone)]
pub struct SyncService {
    high_scores: HighScoreService,
    remote: Option<Arc<dyn ScoreSync>>,
}

impl SyncService {
    #[must_use]
    pub fn new(high_scores: HighScoreService, remote: Option<Arc<dyn ScoreSync>>) -> Self {
        Self {
            high_scores,
            remote,
        }
    }

    #[must_use]
    pub fn disabled(high_scores: HighScoreService) -> Self {
        Self::new(high_scores, None)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Fetch remote bests and merge them over local ones.
    ///
    /// Returns the merged table, or `None` when sync is off or anything failed.
    pub async fn pull(&self) -> Option<HighScores> {
        let remote = self.remote.as_ref()?;
        let scores = match remote.fetch_high_scores().await {
            Ok(scores) => scores,
            Err(err) => {
                warn!(error = %err, "fetching remote high scores failed");
                return None;
            }
        };
        debug!(games = scores.len(), "fetched remote high scores");
        match self.high_scores.merge_remote(scores).await {
            Ok(merged) => Some(merged),
            Err(err) => {
                warn!(error = %err, "merging remote high scores failed");
                None
            }
        }
    }

    /// Upload a finished game, then refresh bests from the remote.
    pub async fn after_game(&self, result: &GameResult) -> Option<HighScores> {
        let remote = self.remote.as_ref()?;
        if let Err(err) = remote.push_result(&result.submission()).await {
            warn!(error = %err, game = %result.game_id(), "pushing result failed");
        }
        self.pull().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use quiz_core::Clock;
    use quiz_core::model::{AnswerRecord, Operator, Problem};
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    #[derive(Default)]
    struct FakeRemote {
        pushed: Mutex<Vec<ScoreSubmission>>,
        rows: Vec<RemoteScoreRow>,
        failing: bool,
    }

    #[async_trait]
    impl ScoreSync for FakeRemote {
        async fn push_result(&self, submission: &ScoreSubmission) -> Result<(), SyncError> {
            if self.failing {
                return Err(SyncError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            }
            self.pushed.lock().unwrap().push(submission.clone());
            Ok(())
        }

        async fn fetch_high_scores(&self) -> Result<HighScores, SyncError> {
            if self.failing {
                return Err(SyncError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            }
            best_per_game(self.rows.clone())
        }
    }

    fn row(game: &str, score: u32, days: i64) -> RemoteScoreRow {
        RemoteScoreRow {
            game_name: game.to_string(),
            score,
            total: 20,
            percentage: 0,
            created_at: fixed_now() + chrono::Duration::days(days),
        }
    }

    fn result(correct: usize) -> GameResult {
        let answers = (0..4)
            .map(|i| {
                let problem = Problem::new(6, 3, Operator::Divide).unwrap();
                AnswerRecord::grade(problem, (i < correct).then_some(2))
            })
            .collect();
        GameResult::from_answers(GameId::from("speed-maths"), "Speed Maths", answers)
    }

    fn high_scores() -> HighScoreService {
        HighScoreService::new(Clock::fixed(fixed_now()), Arc::new(InMemoryRepository::new()))
    }

    #[test]
    fn best_per_game_keeps_highest_and_first_on_ties() {
        let best = best_per_game(vec![
            row("speed-maths", 12, 0),
            row("speed-maths", 15, 1),
            row("speed-maths", 15, 2),
            row("practice-maths", 20, 3),
        ])
        .unwrap();
        assert_eq!(best.len(), 2);
        let speed = best.get(&GameId::from("speed-maths")).unwrap();
        assert_eq!(speed.score, 15);
        assert_eq!(speed.date, fixed_now() + chrono::Duration::days(1));
    }

    #[test]
    fn rows_with_impossible_scores_are_rejected() {
        let mut over = row("speed-maths", 21, 0);
        assert!(matches!(
            best_per_game(vec![row("speed-maths", 12, 0), over.clone()]),
            Err(SyncError::InvalidRow(msg)) if msg.contains("exceeds total")
        ));

        over.score = 20;
        over.percentage = 101;
        assert!(matches!(
            over.validate(),
            Err(SyncError::InvalidRow(msg)) if msg.contains("percentage")
        ));
    }

    #[tokio::test]
    async fn invalid_remote_rows_are_not_merged() {
        let local = high_scores();
        let remote = Arc::new(FakeRemote {
            rows: vec![row("practice-maths", 25, 0)],
            ..FakeRemote::default()
        });
        let svc = SyncService::new(local.clone(), Some(remote));

        assert!(svc.pull().await.is_none());
        assert!(local.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn after_game_pushes_then_merges_remote_bests() {
        let remote = Arc::new(FakeRemote {
            rows: vec![row("practice-maths", 18, 0)],
            ..FakeRemote::default()
        });
        let svc = SyncService::new(high_scores(), Some(remote.clone()));

        let merged = svc.after_game(&result(3)).await.unwrap();

        let pushed = remote.pushed.lock().unwrap().clone();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].score, 3);
        assert_eq!(pushed[0].percentage, 75);
        assert_eq!(merged.get(&GameId::from("practice-maths")).unwrap().score, 18);
    }

    #[tokio::test]
    async fn failures_are_swallowed_and_leave_local_scores_alone() {
        let local = high_scores();
        local.record_result(&result(4)).await.unwrap();
        let remote = Arc::new(FakeRemote {
            failing: true,
            ..FakeRemote::default()
        });
        let svc = SyncService::new(local.clone(), Some(remote));

        assert!(svc.after_game(&result(1)).await.is_none());
        let best = local.best(&GameId::from("speed-maths")).await.unwrap().unwrap();
        assert_eq!(best.score, 4);
    }

    #[tokio::test]
    async fn disabled_sync_does_nothing() {
        let svc = SyncService::disabled(high_scores());
        assert!(!svc.is_enabled());
        assert!(svc.pull().await.is_none());
        assert!(svc.after_game(&result(2)).await.is_none());
    }
}
