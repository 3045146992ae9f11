/// Lifecycle of a session.
///
/// `Idle → AwaitingAnswer ⇄ Feedback → … → Completed`. `Stopped` is entered
/// from any unfinished state by `destroy()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingAnswer,
    /// Untimed only: showing whether the last answer was right.
    Feedback { correct: bool },
    Completed,
    Stopped,
}

impl SessionState {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Stopped)
    }
}
