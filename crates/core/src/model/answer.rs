use serde::Serialize;

use crate::model::Problem;

/// The graded answer to one problem.
///
/// `user_answer == None` means no answer was given (a timed-out question).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    problem: Problem,
    user_answer: Option<i64>,
    is_correct: bool,
}

impl AnswerRecord {
    /// Grade `user_answer` against the problem.
    #[must_use]
    pub fn grade(problem: Problem, user_answer: Option<i64>) -> Self {
        let is_correct = problem.is_correct(user_answer);
        Self {
            problem,
            user_answer,
            is_correct,
        }
    }

    #[must_use]
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    #[must_use]
    pub fn user_answer(&self) -> Option<i64> {
        self.user_answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}
