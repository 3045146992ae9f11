use quiz_core::model::{AnswerRecord, GameResult};
use services::LastResult;

pub const NO_ANSWER: &str = "No answer";

/// One line of the per-question breakdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakdownRowVm {
    /// `3. 12 ÷ 4 = ?`
    pub question: String,
    /// The player's answer, or `No answer` after a timeout.
    pub answer: String,
    /// Only present when the answer was wrong.
    pub correct_answer: Option<i64>,
    pub is_correct: bool,
}

impl BreakdownRowVm {
    #[must_use]
    pub fn from_record(position: usize, record: &AnswerRecord) -> Self {
        let problem = record.problem();
        Self {
            question: format!("{position}. {} = ?", problem.display_text()),
            answer: record
                .user_answer()
                .map_or_else(|| NO_ANSWER.to_string(), |value| value.to_string()),
            correct_answer: (!record.is_correct()).then(|| problem.correct_answer()),
            is_correct: record.is_correct(),
        }
    }

    /// Single-line rendering, e.g. `2. 5 - 3 = ?  1 (2)`.
    #[must_use]
    pub fn line(&self) -> String {
        match self.correct_answer {
            Some(correct) => format!("{}  {} ({correct})", self.question, self.answer),
            None => format!("{}  {}", self.question, self.answer),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub title: String,
    pub is_new_high_score: bool,
    pub score_text: String,
    pub percentage_text: String,
    pub rows: Vec<BreakdownRowVm>,
}

impl ResultsVm {
    #[must_use]
    pub fn new(result: &GameResult, is_new_high_score: bool) -> Self {
        Self {
            title: format!("{} Complete!", result.display_name()),
            is_new_high_score,
            score_text: format!("{}/{}", result.score(), result.total()),
            percentage_text: format!("{}%", result.percentage()),
            rows: result
                .answers()
                .iter()
                .enumerate()
                .map(|(i, record)| BreakdownRowVm::from_record(i + 1, record))
                .collect(),
        }
    }

    #[must_use]
    pub fn banner(&self) -> Option<&'static str> {
        self.is_new_high_score.then_some("New High Score!")
    }
}

impl From<&LastResult> for ResultsVm {
    fn from(last: &LastResult) -> Self {
        Self::new(&last.result, last.is_new_high_score)
    }
}
