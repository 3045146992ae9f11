use quiz_core::model::{GameId, HighScore};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_high_score_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<(GameId, HighScore), StorageError> {
    let game_id = GameId::new(row.try_get::<String, _>("game_id").map_err(ser)?);
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let total = u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?;
    let date = row.try_get("achieved_at").map_err(ser)?;
    Ok((game_id, HighScore::new(score, total, date)))
}
