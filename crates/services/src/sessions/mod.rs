mod controller;
mod observer;
mod progress;
mod runner;
mod state;
mod timer;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::SessionController;
pub use observer::{EventLog, Feedback, SessionEvent, SessionObserver};
pub use progress::SessionProgress;
pub use runner::{SessionInput, SessionRunner};
pub use state::SessionState;
pub use timer::{
    FeedbackDelays, ManualScheduler, ManualTimers, Scheduled, TimerScheduler, TimerToken,
    TokioScheduler,
};
