use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::GameId;

/// Best score recorded for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u32,
    pub total: u32,
    pub date: DateTime<Utc>,
}

impl HighScore {
    #[must_use]
    pub fn new(score: u32, total: u32, date: DateTime<Utc>) -> Self {
        Self { score, total, date }
    }

    /// A new score only replaces the best when it is strictly greater.
    #[must_use]
    pub fn is_beaten_by(&self, score: u32) -> bool {
        score > self.score
    }
}

/// High scores keyed by game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores(BTreeMap<GameId, HighScore>);

impl HighScores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, game_id: &GameId) -> Option<&HighScore> {
        self.0.get(game_id)
    }

    pub fn insert(&mut self, game_id: GameId, score: HighScore) -> Option<HighScore> {
        self.0.insert(game_id, score)
    }

    /// True when `score` would become the new best for `game_id`.
    #[must_use]
    pub fn is_improvement(&self, game_id: &GameId, score: u32) -> bool {
        self.get(game_id).is_none_or(|best| best.is_beaten_by(score))
    }

    /// Overlay remote entries on top of local ones.
    ///
    /// Remote wins for every key it contains, even when its score is lower.
    pub fn merge_remote(&mut self, remote: HighScores) {
        self.0.extend(remote.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GameId, &HighScore)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(GameId, HighScore)> for HighScores {
    fn from_iter<T: IntoIterator<Item = (GameId, HighScore)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for HighScores {
    type Item = (GameId, HighScore);
    type IntoIter = std::collections::btree_map::IntoIter<GameId, HighScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
