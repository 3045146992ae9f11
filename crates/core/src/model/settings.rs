use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Operator;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Configuration errors. These are caller bugs, not runtime conditions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("total questions must be > 0")]
    NoQuestions,

    #[error("number range is inverted: min {min} > max {max}")]
    InvalidRange { min: i32, max: i32 },

    #[error("at least one operation is required")]
    NoOperations,

    #[error("time per question must be > 0 seconds")]
    InvalidTimeLimit,
}

//
// ─── NUMBER RANGE ──────────────────────────────────────────────────────────────
//

/// Inclusive operand range.
///
/// Bounds are `i32` so every product and quotient seed fits in `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRange {
    min: i32,
    max: i32,
}

impl NumberRange {
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidRange` if `min > max`.
    pub fn new(min: i32, max: i32) -> Result<Self, SettingsError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    #[must_use]
    pub fn min(&self) -> i32 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> i32 {
        self.max
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.min > self.max {
            return Err(SettingsError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Settings for one game session.
///
/// `time_per_question == None` means the session is untimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    total_questions: u32,
    number_range: NumberRange,
    operations: Vec<Operator>,
    time_per_question: Option<u32>,
}

impl GameSettings {
    /// # Errors
    ///
    /// Returns `SettingsError` if any field is out of bounds.
    pub fn new(
        total_questions: u32,
        number_range: NumberRange,
        operations: Vec<Operator>,
        time_per_question: Option<u32>,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            total_questions,
            number_range,
            operations,
            time_per_question,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Twenty questions, five seconds each, operands 1-12, all operators.
    #[must_use]
    pub fn speed_maths() -> Self {
        Self {
            total_questions: 20,
            number_range: NumberRange { min: 1, max: 12 },
            operations: Operator::ALL.to_vec(),
            time_per_question: Some(5),
        }
    }

    /// Same shape as `speed_maths` without a time limit.
    #[must_use]
    pub fn practice_maths() -> Self {
        Self {
            time_per_question: None,
            ..Self::speed_maths()
        }
    }

    /// Re-check every invariant.
    ///
    /// Deserialized settings bypass `new`, so sessions call this before generating.
    ///
    /// # Errors
    ///
    /// Returns the first `SettingsError` found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.total_questions == 0 {
            return Err(SettingsError::NoQuestions);
        }
        self.number_range.validate()?;
        if self.operations.is_empty() {
            return Err(SettingsError::NoOperations);
        }
        if self.time_per_question == Some(0) {
            return Err(SettingsError::InvalidTimeLimit);
        }
        Ok(())
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn number_range(&self) -> NumberRange {
        self.number_range
    }

    #[must_use]
    pub fn operations(&self) -> &[Operator] {
        &self.operations
    }

    #[must_use]
    pub fn time_per_question(&self) -> Option<u32> {
        self.time_per_question
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.time_per_question.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_settings() {
        let range = NumberRange::new(1, 5).unwrap();
        assert_eq!(
            GameSettings::new(0, range, vec![Operator::Add], None).unwrap_err(),
            SettingsError::NoQuestions
        );
        assert_eq!(
            GameSettings::new(4, range, Vec::new(), None).unwrap_err(),
            SettingsError::NoOperations
        );
        assert_eq!(
            GameSettings::new(4, range, vec![Operator::Add], Some(0)).unwrap_err(),
            SettingsError::InvalidTimeLimit
        );
        assert_eq!(
            NumberRange::new(5, 1).unwrap_err(),
            SettingsError::InvalidRange { min: 5, max: 1 }
        );
    }

    #[test]
    fn deserialized_settings_are_revalidated() {
        let raw = r#"{
            "total_questions": 3,
            "number_range": { "min": 9, "max": 2 },
            "operations": ["add"],
            "time_per_question": null
        }"#;
        let settings: GameSettings = serde_json::from_str(raw).unwrap();
        assert_eq!(
            settings.validate().unwrap_err(),
            SettingsError::InvalidRange { min: 9, max: 2 }
        );
    }

    #[test]
    fn default_games_differ_only_in_timing() {
        let speed = GameSettings::speed_maths();
        let practice = GameSettings::practice_maths();
        assert!(speed.is_timed());
        assert!(!practice.is_timed());
        assert_eq!(speed.operations(), practice.operations());
        assert_eq!(speed.total_questions(), 20);
    }
}
