use std::fmt;
use std::time::Duration;

use quiz_core::QuestionGenerator;
use quiz_core::model::{AnswerRecord, GameId, GameResult, GameSettings, Problem};
use tracing::{debug, info};

use super::observer::{Feedback, Observers, SessionObserver};
use super::progress::SessionProgress;
use super::state::SessionState;
use super::timer::{FeedbackDelays, TimerScheduler, TimerToken};
use crate::error::SessionError;

const TICK_PERIOD: Duration = Duration::from_secs(1);

//
// ─── SESSION CONTROLLER ────────────────────────────────────────────────────────
//

/// Drives one game from the first problem to the final `GameResult`.
///
/// The controller is presentation-free: renderers call `start`,
/// `submit_answer` and `destroy`, read the accessors, and subscribe a
/// `SessionObserver` for notifications. Timer firings come back through
/// `handle_timer`; only the token from the latest arming is honoured, so a
/// firing that lost a race with a submit or `destroy` has no effect.
pub struct SessionController {
    game_id: GameId,
    display_name: String,
    settings: GameSettings,
    feedback: Option<FeedbackDelays>,
    generator: QuestionGenerator,
    scheduler: Box<dyn TimerScheduler>,
    observers: Observers,
    problems: Vec<Problem>,
    index: usize,
    score: u32,
    answers: Vec<AnswerRecord>,
    state: SessionState,
    running: bool,
    active_timer: Option<TimerToken>,
    next_token: u64,
    remaining: Option<u32>,
    result: Option<GameResult>,
}

impl SessionController {
    #[must_use]
    pub fn new(
        game_id: GameId,
        display_name: impl Into<String>,
        settings: GameSettings,
        scheduler: Box<dyn TimerScheduler>,
    ) -> Self {
        Self {
            game_id,
            display_name: display_name.into(),
            settings,
            feedback: None,
            generator: QuestionGenerator::new(),
            scheduler,
            observers: Observers::default(),
            problems: Vec::new(),
            index: 0,
            score: 0,
            answers: Vec::new(),
            state: SessionState::Idle,
            running: false,
            active_timer: None,
            next_token: 0,
            remaining: None,
            result: None,
        }
    }

    /// Pause between questions in untimed mode. Ignored for timed sessions.
    #[must_use]
    pub fn with_feedback(mut self, delays: Option<FeedbackDelays>) -> Self {
        self.feedback = delays;
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: QuestionGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
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
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Index of the next problem to answer (0-based).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// The problem awaiting an answer, if any.
    #[must_use]
    pub fn current_problem(&self) -> Option<&Problem> {
        if self.state == SessionState::AwaitingAnswer {
            self.problems.get(self.index)
        } else {
            None
        }
    }

    /// Seconds left on the current question while the countdown is armed.
    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.remaining
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = usize::try_from(self.settings.total_questions()).unwrap_or(usize::MAX);
        SessionProgress {
            total,
            answered: self.answers.len(),
            remaining: total.saturating_sub(self.answers.len()),
            score: self.score,
            is_complete: self.state == SessionState::Completed,
        }
    }

    /// Generate the problem set and present the first problem.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotIdle` if the session was already started or destroyed.
    /// Returns `SessionError::Settings` if the settings are invalid.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::NotIdle);
        }
        let problems = self.generator.generate_set(&self.settings)?;
        info!(
            game = %self.game_id,
            total = problems.len(),
            timed = self.settings.is_timed(),
            "session started"
        );
        self.problems = problems;
        self.running = true;
        self.present_current();
        Ok(())
    }

    /// Grade `value` against the current problem and move on.
    ///
    /// `None` means no answer and is always incorrect. Outside
    /// `AwaitingAnswer` the call is ignored and returns `None`.
    pub fn submit_answer(&mut self, value: Option<i64>) -> Option<&AnswerRecord> {
        if self.state != SessionState::AwaitingAnswer {
            debug!(state = ?self.state, "ignoring answer outside awaiting-answer");
            return None;
        }
        self.cancel_timer();

        let problem = self.problems.get(self.index)?.clone();
        let answered = self.index;
        let record = AnswerRecord::grade(problem, value);
        let correct = record.is_correct();
        let correct_answer = record.problem().correct_answer();
        if correct {
            self.score = self.score.saturating_add(1);
        }
        self.answers.push(record);
        self.index += 1;
        if let Some(record) = self.answers.last() {
            self.observers.answer(answered, record);
        }
        debug!(index = answered, ?value, correct, "answer recorded");

        match self.feedback_delays() {
            Some(delays) if self.index < self.problems.len() => {
                let feedback = Feedback {
                    correct,
                    correct_answer,
                    delay: delays.for_outcome(correct),
                };
                self.state = SessionState::Feedback { correct };
                self.observers.feedback(&feedback);
                let token = self.arm();
                self.scheduler.schedule_once(token, feedback.delay);
            }
            _ => self.advance(),
        }

        self.answers.get(answered)
    }

    /// Deliver a firing from the scheduler.
    pub fn handle_timer(&mut self, token: TimerToken) {
        if self.active_timer != Some(token) {
            debug!(token = token.value(), "dropping stale timer firing");
            return;
        }
        match self.state {
            SessionState::AwaitingAnswer => self.tick(),
            SessionState::Feedback { .. } => {
                self.cancel_timer();
                self.advance();
            }
            _ => self.cancel_timer(),
        }
    }

    /// Stop the timer and end the session. Safe to call repeatedly from any state.
    pub fn destroy(&mut self) {
        self.cancel_timer();
        self.running = false;
        if !self.state.is_finished() {
            debug!(game = %self.game_id, index = self.index, "session destroyed");
            self.state = SessionState::Stopped;
        }
    }

    fn feedback_delays(&self) -> Option<FeedbackDelays> {
        if self.settings.is_timed() {
            None
        } else {
            self.feedback
        }
    }

    fn present_current(&mut self) {
        self.state = SessionState::AwaitingAnswer;
        let total = self.problems.len();
        if let Some(problem) = self.problems.get(self.index) {
            self.observers.question(self.index, total, problem);
        }
        if let Some(seconds) = self.settings.time_per_question() {
            let token = self.arm();
            self.remaining = Some(seconds);
            self.observers.tick(seconds);
            self.scheduler.schedule_interval(token, TICK_PERIOD);
        }
    }

    fn tick(&mut self) {
        let remaining = self.remaining.unwrap_or(0).saturating_sub(1);
        self.remaining = Some(remaining);
        self.observers.tick(remaining);
        if remaining == 0 {
            self.cancel_timer();
            debug!(index = self.index, "question timed out");
            self.observers.timeout(self.index);
            self.submit_answer(None);
        }
    }

    fn advance(&mut self) {
        if self.index >= self.problems.len() {
            self.complete();
        } else {
            self.present_current();
        }
    }

    fn complete(&mut self) {
        self.cancel_timer();
        self.state = SessionState::Completed;
        self.running = false;
        let result = GameResult::from_answers(
            self.game_id.clone(),
            self.display_name.clone(),
            self.answers.clone(),
        );
        info!(
            game = %self.game_id,
            score = result.score(),
            total = result.total(),
            percentage = result.percentage(),
            "session completed"
        );
        self.observers.complete(&result);
        self.result = Some(result);
    }

    /// Replace any live schedule with a fresh token.
    fn arm(&mut self) -> TimerToken {
        self.scheduler.cancel();
        self.next_token += 1;
        let token = TimerToken::new(self.next_token);
        self.active_timer = Some(token);
        token
    }

    fn cancel_timer(&mut self) {
        self.scheduler.cancel();
        self.active_timer = None;
        self.remaining = None;
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("game_id", &self.game_id)
            .field("state", &self.state)
            .field("problems_len", &self.problems.len())
            .field("index", &self.index)
            .field("score", &self.score)
            .field("observers", &self.observers.len())
            .field("active_timer", &self.active_timer)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
