use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{GameId, GameResult, HighScore, HighScores};
use storage::repository::HighScoreRepository;
use tracing::info;

use crate::error::HighScoreServiceError;

/// Keeps the per-game best score in local storage.
#[derive(Clone)]
pub struct HighScoreService {
    clock: Clock,
    repo: Arc<dyn HighScoreRepository>,
}

impl HighScoreService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn HighScoreRepository>) -> Self {
        Self { clock, repo }
    }

    /// Store `result` if it beats the saved best. Returns whether it did.
    ///
    /// A game with no saved best always records. Ties keep the older entry.
    ///
    /// # Errors
    ///
    /// Returns `HighScoreServiceError` if storage fails.
    pub async fn record_result(&self, result: &GameResult) -> Result<bool, HighScoreServiceError> {
        let current = self.repo.get_high_score(result.game_id()).await?;
        if current.is_some_and(|best| !best.is_beaten_by(result.score())) {
            return Ok(false);
        }

        let entry = HighScore::new(result.score(), result.total(), self.clock.now());
        self.repo.put_high_score(result.game_id(), &entry).await?;
        info!(
            game = %result.game_id(),
            score = result.score(),
            total = result.total(),
            "new high score"
        );
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `HighScoreServiceError` if storage fails.
    pub async fn best(&self, game_id: &GameId) -> Result<Option<HighScore>, HighScoreServiceError> {
        Ok(self.repo.get_high_score(game_id).await?)
    }

    /// # Errors
    ///
    /// Returns `HighScoreServiceError` if storage fails.
    pub async fn all(&self) -> Result<HighScores, HighScoreServiceError> {
        Ok(self.repo.list_high_scores().await?)
    }

    /// Persist remote bests over local ones and return the merged table.
    ///
    /// Remote entries win for every game they cover, even with a lower score.
    ///
    /// # Errors
    ///
    /// Returns `HighScoreServiceError` if storage fails.
    pub async fn merge_remote(&self, remote: HighScores) -> Result<HighScores, HighScoreServiceError> {
        for (game_id, score) in remote.iter() {
            self.repo.put_high_score(game_id, score).await?;
        }
        Ok(self.repo.list_high_scores().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{AnswerRecord, Operator, Problem};
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn result(game: &str, correct: usize, total: usize) -> GameResult {
        let answers = (0..total)
            .map(|i| {
                let problem = Problem::new(2, 3, Operator::Add).unwrap();
                let answer = if i < correct { Some(5) } else { None };
                AnswerRecord::grade(problem, answer)
            })
            .collect();
        GameResult::from_answers(GameId::from(game), "Game", answers)
    }

    fn service() -> HighScoreService {
        HighScoreService::new(
            Clock::fixed(fixed_now()),
            Arc::new(InMemoryRepository::new()),
        )
    }

    #[tokio::test]
    async fn first_result_is_always_a_high_score() {
        let svc = service();
        assert!(svc.record_result(&result("speed-maths", 0, 4)).await.unwrap());

        let best = svc.best(&GameId::from("speed-maths")).await.unwrap().unwrap();
        assert_eq!(best.score, 0);
        assert_eq!(best.total, 4);
        assert_eq!(best.date, fixed_now());
    }

    #[tokio::test]
    async fn only_strict_improvements_replace_the_best() {
        let svc = service();
        let game = GameId::from("speed-maths");
        assert!(svc.record_result(&result("speed-maths", 3, 4)).await.unwrap());
        assert!(!svc.record_result(&result("speed-maths", 3, 4)).await.unwrap());
        assert!(!svc.record_result(&result("speed-maths", 2, 4)).await.unwrap());
        assert_eq!(svc.best(&game).await.unwrap().unwrap().score, 3);

        assert!(svc.record_result(&result("speed-maths", 4, 4)).await.unwrap());
        assert_eq!(svc.best(&game).await.unwrap().unwrap().score, 4);
    }

    #[tokio::test]
    async fn games_are_tracked_separately() {
        let svc = service();
        svc.record_result(&result("speed-maths", 4, 4)).await.unwrap();
        assert!(svc.record_result(&result("practice-maths", 1, 4)).await.unwrap());
        assert_eq!(svc.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn remote_scores_overwrite_local_ones() {
        let svc = service();
        let game = GameId::from("speed-maths");
        svc.record_result(&result("speed-maths", 4, 4)).await.unwrap();

        let remote_date = fixed_now() - Duration::days(3);
        let remote: HighScores = [(game.clone(), HighScore::new(2, 4, remote_date))]
            .into_iter()
            .collect();
        let merged = svc.merge_remote(remote).await.unwrap();

        assert_eq!(merged.get(&game).unwrap().score, 2);
        let stored = svc.best(&game).await.unwrap().unwrap();
        assert_eq!(stored.score, 2);
        assert_eq!(stored.date, remote_date);
    }
}
