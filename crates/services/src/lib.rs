#![forbid(unsafe_code)]

pub mod app_services;
pub mod app_state;
pub mod error;
pub mod high_score_service;
pub mod registry;
pub mod sessions;
pub mod sync;

pub use quiz_core::Clock;

pub use app_services::{AppServices, RecordedGame};
pub use app_state::{AppState, LastResult, View};
pub use error::{
    AppServicesError, HighScoreServiceError, RegistryError, SessionError, SyncError,
};
pub use high_score_service::HighScoreService;
pub use registry::{GameDescriptor, GameRegistry, PRACTICE_MATHS, SPEED_MATHS};
pub use sessions::{
    EventLog, Feedback, FeedbackDelays, SessionController, SessionEvent, SessionInput,
    SessionObserver, SessionProgress, SessionRunner, SessionState, TimerScheduler, TimerToken,
};
pub use sync::{HttpScoreSync, ScoreSync, SyncConfig, SyncService};
