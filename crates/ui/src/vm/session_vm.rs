use quiz_core::model::{AnswerRecord, GameResult, Problem};
use services::{Feedback, SessionObserver};

use crate::vm::time_fmt::format_seconds;

/// Seconds at or below which the countdown is highlighted.
pub const TIMER_WARNING_SECONDS: u32 = 2;

/// Live state of the game screen, kept current by session notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionVm {
    total: usize,
    index: usize,
    question: Option<String>,
    remaining: Option<u32>,
    feedback: Option<String>,
    answered: usize,
    finished: bool,
}

impl SessionVm {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            index: 0,
            question: None,
            remaining: None,
            feedback: None,
            answered: 0,
            finished: false,
        }
    }

    /// `Question 3 of 20`
    #[must_use]
    pub fn counter_text(&self) -> String {
        format!("Question {} of {}", self.index + 1, self.total)
    }

    /// Width of the progress bar: share of questions already behind the player.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let done = if self.finished { self.total } else { self.index };
        u8::try_from(done.min(self.total) * 100 / self.total).unwrap_or(100)
    }

    /// `7 × 8 = ?`
    #[must_use]
    pub fn question_text(&self) -> Option<String> {
        self.question.as_ref().map(|text| format!("{text} = ?"))
    }

    #[must_use]
    pub fn timer_text(&self) -> Option<String> {
        self.remaining.map(format_seconds)
    }

    #[must_use]
    pub fn timer_warning(&self) -> bool {
        self.remaining
            .is_some_and(|remaining| remaining <= TIMER_WARNING_SECONDS)
    }

    #[must_use]
    pub fn feedback_text(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.answered
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl SessionObserver for SessionVm {
    fn on_question(&mut self, index: usize, total: usize, problem: &Problem) {
        self.index = index;
        self.total = total;
        self.question = Some(problem.display_text().to_string());
        self.feedback = None;
    }

    fn on_tick(&mut self, remaining: u32) {
        self.remaining = Some(remaining);
    }

    fn on_answer(&mut self, index: usize, _record: &AnswerRecord) {
        self.answered = index + 1;
        self.remaining = None;
    }

    fn on_feedback(&mut self, feedback: &Feedback) {
        self.feedback = Some(if feedback.correct {
            "Correct!".to_string()
        } else {
            format!("The answer was {}", feedback.correct_answer)
        });
    }

    fn on_complete(&mut self, _result: &GameResult) {
        self.finished = true;
        self.question = None;
        self.remaining = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use quiz_core::model::Operator;

    fn problem() -> Problem {
        Problem::new(7, 8, Operator::Multiply).unwrap()
    }

    #[test]
    fn question_updates_counter_and_progress() {
        let mut vm = SessionVm::new(20);
        vm.on_question(4, 20, &problem());
        assert_eq!(vm.counter_text(), "Question 5 of 20");
        assert_eq!(vm.progress_percent(), 20);
        assert_eq!(vm.question_text().as_deref(), Some("7 × 8 = ?"));
    }

    #[test]
    fn countdown_warns_in_the_last_two_seconds() {
        let mut vm = SessionVm::new(20);
        vm.on_tick(3);
        assert_eq!(vm.timer_text().as_deref(), Some("3s"));
        assert!(!vm.timer_warning());
        vm.on_tick(2);
        assert!(vm.timer_warning());
        vm.on_answer(0, &AnswerRecord::grade(problem(), None));
        assert!(vm.timer_text().is_none());
        assert!(!vm.timer_warning());
    }

    #[test]
    fn feedback_messages_and_reset_on_next_question() {
        let mut vm = SessionVm::new(2);
        vm.on_feedback(&Feedback {
            correct: false,
            correct_answer: 56,
            delay: Duration::from_millis(1500),
        });
        assert_eq!(vm.feedback_text(), Some("The answer was 56"));
        vm.on_feedback(&Feedback {
            correct: true,
            correct_answer: 56,
            delay: Duration::from_millis(500),
        });
        assert_eq!(vm.feedback_text(), Some("Correct!"));
        vm.on_question(1, 2, &problem());
        assert!(vm.feedback_text().is_none());
    }
}
