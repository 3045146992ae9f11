use async_trait::async_trait;
use quiz_core::model::{GameId, HighScore, HighScores};

use super::SqliteRepository;
use super::mapping::map_high_score_row;
use crate::repository::{HighScoreRepository, StorageError};

#[async_trait]
impl HighScoreRepository for SqliteRepository {
    async fn get_high_score(&self, game_id: &GameId) -> Result<Option<HighScore>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT game_id, score, total, achieved_at
                FROM high_scores
                WHERE game_id = ?1
            ",
        )
        .bind(game_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let (_, score) = map_high_score_row(&row)?;
        Ok(Some(score))
    }

    async fn list_high_scores(&self) -> Result<HighScores, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT game_id, score, total, achieved_at
                FROM high_scores
                ORDER BY game_id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = HighScores::new();
        for row in rows {
            let (game_id, score) = map_high_score_row(&row)?;
            out.insert(game_id, score);
        }
        Ok(out)
    }

    async fn put_high_score(
        &self,
        game_id: &GameId,
        score: &HighScore,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO high_scores (game_id, score, total, achieved_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(game_id) DO UPDATE SET
                    score = excluded.score,
                    total = excluded.total,
                    achieved_at = excluded.achieved_at
            ",
        )
        .bind(game_id.as_str())
        .bind(i64::from(score.score))
        .bind(i64::from(score.total))
        .bind(score.date)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
