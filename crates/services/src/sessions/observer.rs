use std::sync::{Arc, Mutex};
use std::time::Duration;

use quiz_core::model::{AnswerRecord, GameResult, Problem};

/// Feedback shown between questions in untimed sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub correct_answer: i64,
    pub delay: Duration,
}

/// Notifications emitted by `SessionController`.
///
/// Every method has an empty default so observers only implement what they render.
pub trait SessionObserver: Send {
    /// A problem is now awaiting an answer. `index` is 0-based.
    fn on_question(&mut self, _index: usize, _total: usize, _problem: &Problem) {}

    /// Seconds left on the current question. Also sent once when the timer is armed.
    fn on_tick(&mut self, _remaining: u32) {}

    /// The countdown for question `index` reached zero.
    fn on_timeout(&mut self, _index: usize) {}

    fn on_answer(&mut self, _index: usize, _record: &AnswerRecord) {}

    fn on_feedback(&mut self, _feedback: &Feedback) {}

    fn on_complete(&mut self, _result: &GameResult) {}
}

/// Lets a renderer keep a handle to the observer it registered.
impl<T: SessionObserver + ?Sized> SessionObserver for Arc<Mutex<T>> {
    fn on_question(&mut self, index: usize, total: usize, problem: &Problem) {
        if let Ok(mut inner) = self.lock() {
            inner.on_question(index, total, problem);
        }
    }

    fn on_tick(&mut self, remaining: u32) {
        if let Ok(mut inner) = self.lock() {
            inner.on_tick(remaining);
        }
    }

    fn on_timeout(&mut self, index: usize) {
        if let Ok(mut inner) = self.lock() {
            inner.on_timeout(index);
        }
    }

    fn on_answer(&mut self, index: usize, record: &AnswerRecord) {
        if let Ok(mut inner) = self.lock() {
            inner.on_answer(index, record);
        }
    }

    fn on_feedback(&mut self, feedback: &Feedback) {
        if let Ok(mut inner) = self.lock() {
            inner.on_feedback(feedback);
        }
    }

    fn on_complete(&mut self, result: &GameResult) {
        if let Ok(mut inner) = self.lock() {
            inner.on_complete(result);
        }
    }
}

/// Flattened notification, as recorded by `EventLog`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Question { index: usize, text: String },
    Tick(u32),
    Timeout(usize),
    Answer { index: usize, user_answer: Option<i64>, correct: bool },
    Feedback(Feedback),
    Complete { score: u32, total: u32 },
}

/// Observer that records every notification in order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn ticks(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::Tick(remaining) => Some(remaining),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SessionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl SessionObserver for EventLog {
    fn on_question(&mut self, index: usize, _total: usize, problem: &Problem) {
        self.push(SessionEvent::Question {
            index,
            text: problem.display_text().to_string(),
        });
    }

    fn on_tick(&mut self, remaining: u32) {
        self.push(SessionEvent::Tick(remaining));
    }

    fn on_timeout(&mut self, index: usize) {
        self.push(SessionEvent::Timeout(index));
    }

    fn on_answer(&mut self, index: usize, record: &AnswerRecord) {
        self.push(SessionEvent::Answer {
            index,
            user_answer: record.user_answer(),
            correct: record.is_correct(),
        });
    }

    fn on_feedback(&mut self, feedback: &Feedback) {
        self.push(SessionEvent::Feedback(*feedback));
    }

    fn on_complete(&mut self, result: &GameResult) {
        self.push(SessionEvent::Complete {
            score: result.score(),
            total: result.total(),
        });
    }
}

/// Registered observers, notified in subscription order.
#[derive(Default)]
pub(crate) struct Observers(Vec<Box<dyn SessionObserver>>);

impl Observers {
    pub(crate) fn push(&mut self, observer: Box<dyn SessionObserver>) {
        self.0.push(observer);
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn question(&mut self, index: usize, total: usize, problem: &Problem) {
        for o in &mut self.0 {
            o.on_question(index, total, problem);
        }
    }

    pub(crate) fn tick(&mut self, remaining: u32) {
        for o in &mut self.0 {
            o.on_tick(remaining);
        }
    }

    pub(crate) fn timeout(&mut self, index: usize) {
        for o in &mut self.0 {
            o.on_timeout(index);
        }
    }

    pub(crate) fn answer(&mut self, index: usize, record: &AnswerRecord) {
        for o in &mut self.0 {
            o.on_answer(index, record);
        }
    }

    pub(crate) fn feedback(&mut self, feedback: &Feedback) {
        for o in &mut self.0 {
            o.on_feedback(feedback);
        }
    }

    pub(crate) fn complete(&mut self, result: &GameResult) {
        for o in &mut self.0 {
            o.on_complete(result);
        }
    }
}
