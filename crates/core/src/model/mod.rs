mod answer;
mod high_score;
mod ids;
mod operator;
mod problem;
mod result;
mod settings;

pub use ids::GameId;

pub use answer::AnswerRecord;
pub use high_score::{HighScore, HighScores};
pub use operator::{Operator, OperatorError};
pub use problem::{Problem, ProblemError};
pub use result::{GameResult, ScoreSubmission, percentage};
pub use settings::{GameSettings, NumberRange, SettingsError};
