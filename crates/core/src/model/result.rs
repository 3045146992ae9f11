use serde::{Deserialize, Serialize};

use crate::model::{AnswerRecord, GameId};

/// Percentage of `score` out of `total`, rounded half up.
///
/// Computed in integers so `1/3` gives 33 and `1/2` gives 50 with no float drift.
/// A zero total yields 0.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score.min(total));
    let total = u64::from(total);
    let rounded = (200 * score + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

/// Immutable summary of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    game_id: GameId,
    display_name: String,
    score: u32,
    total: u32,
    percentage: u8,
    answers: Vec<AnswerRecord>,
}

impl GameResult {
    /// Build the result from the ordered answer log of a finished session.
    #[must_use]
    pub fn from_answers(
        game_id: GameId,
        display_name: impl Into<String>,
        answers: Vec<AnswerRecord>,
    ) -> Self {
        let total = u32::try_from(answers.len()).unwrap_or(u32::MAX);
        let score = answers.iter().filter(|a| a.is_correct()).count();
        let score = u32::try_from(score).unwrap_or(u32::MAX);
        Self {
            game_id,
            display_name: display_name.into(),
            score,
            total,
            percentage: percentage(score, total),
            answers,
        }
    }

    #[must_use]
    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// The fields pushed to a remote score store.
    #[must_use]
    pub fn submission(&self) -> ScoreSubmission {
        ScoreSubmission {
            game_id: self.game_id.clone(),
            score: self.score,
            total: self.total,
            percentage: self.percentage,
        }
    }
}

/// Summary fields of a result, without the per-question breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub game_id: GameId,
    pub score: u32,
    pub total: u32,
    pub percentage: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Operator, Problem};

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 20), 0);
        assert_eq!(percentage(20, 20), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn result_counts_correct_answers() {
        let problem = Problem::new(2, 3, Operator::Add).unwrap();
        let answers = vec![
            AnswerRecord::grade(problem.clone(), Some(5)),
            AnswerRecord::grade(problem.clone(), Some(4)),
            AnswerRecord::grade(problem, None),
        ];

        let result = GameResult::from_answers(GameId::from("speed-maths"), "Speed Maths", answers);

        assert_eq!(result.score(), 1);
        assert_eq!(result.total(), 3);
        assert_eq!(result.percentage(), 33);
        assert_eq!(result.submission().game_id.as_str(), "speed-maths");
    }
}
