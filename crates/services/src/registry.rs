use quiz_core::model::{GameId, GameSettings};

use crate::error::RegistryError;
use crate::sessions::{
    FeedbackDelays, SessionController, SessionObserver, SessionRunner, TimerScheduler,
    TokioScheduler,
};

pub const SPEED_MATHS: &str = "speed-maths";
pub const PRACTICE_MATHS: &str = "practice-maths";

/// Static description of a playable game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDescriptor {
    id: GameId,
    display_name: String,
    description: String,
    icon: String,
    settings: GameSettings,
    feedback: Option<FeedbackDelays>,
}

impl GameDescriptor {
    /// # Errors
    ///
    /// Returns `RegistryError::Settings` if `settings` are invalid.
    pub fn new(
        id: impl Into<GameId>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        settings: GameSettings,
    ) -> Result<Self, RegistryError> {
        settings.validate()?;
        Ok(Self {
            id: id.into(),
            display_name: display_name.into(),
            description: description.into(),
            icon: icon.into(),
            settings,
            feedback: None,
        })
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: FeedbackDelays) -> Self {
        self.feedback = Some(feedback);
        self
    }

    #[must_use]
    pub fn id(&self) -> &GameId {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn feedback(&self) -> Option<FeedbackDelays> {
        self.feedback
    }

    /// A fresh, unstarted session for this game.
    #[must_use]
    pub fn create_session(&self, scheduler: Box<dyn TimerScheduler>) -> SessionController {
        SessionController::new(
            self.id.clone(),
            self.display_name.clone(),
            self.settings.clone(),
            scheduler,
        )
        .with_feedback(self.feedback)
    }

    /// A session wired to Tokio timers, ready to `run`. Requires a Tokio runtime.
    #[must_use]
    pub fn create_runner(
        &self,
        observers: impl IntoIterator<Item = Box<dyn SessionObserver>>,
    ) -> SessionRunner {
        let (scheduler, timers) = TokioScheduler::channel();
        let mut session = self.create_session(Box::new(scheduler));
        for observer in observers {
            session.subscribe(observer);
        }
        SessionRunner::new(session, timers)
    }
}

/// Games available to the player, in menu order. Fixed once built.
#[derive(Debug, Clone)]
pub struct GameRegistry {
    games: Vec<GameDescriptor>,
}

impl GameRegistry {
    /// The built-in games: a timed sprint and an untimed practice mode.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if a built-in descriptor is rejected.
    pub fn with_defaults() -> Result<Self, RegistryError> {
        let mut registry = Self { games: Vec::new() };
        registry.register(GameDescriptor::new(
            SPEED_MATHS,
            "Speed Maths",
            "20 questions, 5 seconds each. How fast is your maths?",
            "⚡",
            GameSettings::speed_maths(),
        )?)?;
        registry.register(
            GameDescriptor::new(
                PRACTICE_MATHS,
                "Practice Mode",
                "20 questions, no time limit. Practice at your own pace!",
                "📝",
                GameSettings::practice_maths(),
            )?
            .with_feedback(FeedbackDelays::default()),
        )?;
        Ok(registry)
    }

    fn register(&mut self, descriptor: GameDescriptor) -> Result<(), RegistryError> {
        if self.find(descriptor.id()).is_some() {
            return Err(RegistryError::Duplicate(descriptor.id().clone()));
        }
        self.games.push(descriptor);
        Ok(())
    }

    #[must_use]
    pub fn find(&self, id: &GameId) -> Option<&GameDescriptor> {
        self.games.iter().find(|g| g.id() == id)
    }

    /// # Errors
    ///
    /// Returns `RegistryError::UnknownGame` if no game has this id.
    pub fn get(&self, id: &GameId) -> Result<&GameDescriptor, RegistryError> {
        self.find(id).ok_or_else(|| RegistryError::UnknownGame(id.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameDescriptor> {
        self.games.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
