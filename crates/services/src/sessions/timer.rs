use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one arming of the session timer.
///
/// Every arm hands out a fresh token; firings carrying an older token are stale
/// and the controller drops them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// How long the untimed feedback state lasts before the next question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackDelays {
    pub correct: Duration,
    pub incorrect: Duration,
}

impl FeedbackDelays {
    #[must_use]
    pub fn for_outcome(&self, correct: bool) -> Duration {
        if correct { self.correct } else { self.incorrect }
    }
}

impl Default for FeedbackDelays {
    fn default() -> Self {
        Self {
            correct: Duration::from_millis(500),
            incorrect: Duration::from_millis(1500),
        }
    }
}

/// The scheduling mechanism behind the session timer.
///
/// Implementations deliver `token` back to the controller's `handle_timer`.
/// At most one schedule is live; scheduling again replaces it.
pub trait TimerScheduler: Send {
    /// Fire `token` every `period` until cancelled.
    fn schedule_interval(&mut self, token: TimerToken, period: Duration);

    /// Fire `token` once after `delay`.
    fn schedule_once(&mut self, token: TimerToken, delay: Duration);

    /// Stop all pending firings. Must take effect before returning.
    fn cancel(&mut self);
}

//
// ─── MANUAL SCHEDULER ──────────────────────────────────────────────────────────
//

/// What a `ManualScheduler` currently has armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    Interval { token: TimerToken, period: Duration },
    Once { token: TimerToken, delay: Duration },
}

impl Scheduled {
    #[must_use]
    pub fn token(&self) -> TimerToken {
        match self {
            Scheduled::Interval { token, .. } | Scheduled::Once { token, .. } => *token,
        }
    }
}

#[derive(Debug, Default)]
struct ManualState {
    active: Option<Scheduled>,
    cancels: usize,
}

/// Scheduler that never fires by itself.
///
/// The host (or a test) reads the armed token through `ManualTimers` and feeds
/// it to the controller when it decides time has passed.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

/// Read side of a `ManualScheduler`.
#[derive(Debug, Clone)]
pub struct ManualTimers {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> (Self, ManualTimers) {
        let state = Arc::new(Mutex::new(ManualState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            ManualTimers { state },
        )
    }

    fn set(&self, scheduled: Option<Scheduled>) {
        if let Ok(mut guard) = self.state.lock() {
            if scheduled.is_none() && guard.active.is_some() {
                guard.cancels += 1;
            }
            guard.active = scheduled;
        }
    }
}

impl TimerScheduler for ManualScheduler {
    fn schedule_interval(&mut self, token: TimerToken, period: Duration) {
        self.set(Some(Scheduled::Interval { token, period }));
    }

    fn schedule_once(&mut self, token: TimerToken, delay: Duration) {
        self.set(Some(Scheduled::Once { token, delay }));
    }

    fn cancel(&mut self) {
        self.set(None);
    }
}

impl ManualTimers {
    #[must_use]
    pub fn active(&self) -> Option<Scheduled> {
        self.state.lock().ok().and_then(|guard| guard.active)
    }

    /// Number of times a live schedule was cancelled.
    #[must_use]
    pub fn cancels(&self) -> usize {
        self.state.lock().map_or(0, |guard| guard.cancels)
    }
}

//
// ─── TOKIO SCHEDULER ───────────────────────────────────────────────────────────
//

/// Scheduler backed by Tokio timers.
///
/// Firings are sent on an unbounded channel; the owner of the receiver passes
/// them to the controller. Must be used from within a Tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerToken>,
    handle: Option<JoinHandle<()>>,
}

impl TokioScheduler {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, handle: None }, rx)
    }
}

impl TimerScheduler for TokioScheduler {
    fn schedule_interval(&mut self, token: TimerToken, period: Duration) {
        self.cancel();
        let tx = self.tx.clone();
        let start = tokio::time::Instant::now() + period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                if tx.send(token).is_err() {
                    break;
                }
            }
        }));
    }

    fn schedule_once(&mut self, token: TimerToken, delay: Duration) {
        self.cancel();
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(token);
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
