use quiz_core::model::{GameId, GameResult, HighScores};

/// Screen the front-end should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Menu,
    Game,
    Results,
}

/// The most recent finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastResult {
    pub result: GameResult,
    pub is_new_high_score: bool,
}

/// State owned by the application root and handed to the views that need it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    view: View,
    active_game: Option<GameId>,
    last_result: Option<LastResult>,
    high_scores: HighScores,
    user: Option<String>,
}

impl AppState {
    #[must_use]
    pub fn new(high_scores: HighScores) -> Self {
        Self {
            high_scores,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn active_game(&self) -> Option<&GameId> {
        self.active_game.as_ref()
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&LastResult> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn show_menu(&mut self) {
        self.view = View::Menu;
        self.active_game = None;
    }

    /// Switch to the results view. Falls back to the menu when nothing was played yet.
    pub fn show_results(&mut self) {
        if self.last_result.is_some() {
            self.view = View::Results;
            self.active_game = None;
        } else {
            self.show_menu();
        }
    }

    pub fn begin_game(&mut self, game_id: GameId) {
        self.view = View::Game;
        self.active_game = Some(game_id);
    }

    pub fn finish_game(&mut self, result: GameResult, is_new_high_score: bool) {
        self.last_result = Some(LastResult {
            result,
            is_new_high_score,
        });
        self.show_results();
    }

    pub fn set_high_scores(&mut self, high_scores: HighScores) {
        self.high_scores = high_scores;
    }

    pub fn sign_in(&mut self, user_id: impl Into<String>) {
        self.user = Some(user_id.into());
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }
}
