use quiz_core::model::{GameId, HighScores};
use services::{GameDescriptor, GameRegistry};

use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameCardVm {
    pub id: GameId,
    pub icon: String,
    pub name: String,
    pub description: String,
}

impl From<&GameDescriptor> for GameCardVm {
    fn from(game: &GameDescriptor) -> Self {
        Self {
            id: game.id().clone(),
            icon: game.icon().to_string(),
            name: game.display_name().to_string(),
            description: game.description().to_string(),
        }
    }
}

/// `Speed Maths: 17/20`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestScoreVm {
    pub line: String,
    pub date_str: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuVm {
    pub cards: Vec<GameCardVm>,
    /// Registered games with a recorded best, in menu order.
    pub best_scores: Vec<BestScoreVm>,
}

impl MenuVm {
    pub const SUBTITLE: &'static str = "Choose a game to play!";
    pub const BEST_SCORES_TITLE: &'static str = "Your Best Scores";

    #[must_use]
    pub fn new(registry: &GameRegistry, high_scores: &HighScores) -> Self {
        let cards = registry.iter().map(GameCardVm::from).collect();
        let best_scores = registry
            .iter()
            .filter_map(|game| {
                high_scores.get(game.id()).map(|best| BestScoreVm {
                    line: format!("{}: {}/{}", game.display_name(), best.score, best.total),
                    date_str: format_date(best.date),
                })
            })
            .collect();
        Self { cards, best_scores }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::HighScore;
    use quiz_core::time::fixed_now;

    #[test]
    fn lists_games_and_only_known_best_scores() {
        let registry = GameRegistry::with_defaults().unwrap();
        let high_scores: HighScores = [
            (GameId::from("speed-maths"), HighScore::new(17, 20, fixed_now())),
            (GameId::from("retired-game"), HighScore::new(9, 10, fixed_now())),
        ]
        .into_iter()
        .collect();

        let vm = MenuVm::new(&registry, &high_scores);
        assert_eq!(vm.cards.len(), 2);
        assert_eq!(vm.cards[0].icon, "⚡");
        assert_eq!(vm.cards[1].name, "Practice Mode");
        assert_eq!(vm.best_scores.len(), 1);
        assert_eq!(vm.best_scores[0].line, "Speed Maths: 17/20");
    }

    #[test]
    fn no_scores_means_no_best_section() {
        let registry = GameRegistry::with_defaults().unwrap();
        let vm = MenuVm::new(&registry, &HighScores::new());
        assert!(vm.best_scores.is_empty());
    }
}
