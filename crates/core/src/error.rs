use thiserror::Error;

use crate::model::{OperatorError, ProblemError, SettingsError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error(transparent)]
    Operator(#[from] OperatorError),
}
