use serde::Serialize;
use thiserror::Error;

use crate::model::Operator;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProblemError {
    #[error("subtraction must not go negative: {operand1} - {operand2}")]
    NegativeDifference { operand1: i64, operand2: i64 },

    #[error("divisor must not be zero")]
    ZeroDivisor,

    #[error("{operand1} is not a multiple of {operand2}")]
    InexactDivision { operand1: i64, operand2: i64 },

    #[error("arithmetic overflow")]
    Overflow,
}

/// One arithmetic question with its precomputed answer.
///
/// Problems are immutable once built. Subtraction never goes negative and
/// division is always exact with a non-zero divisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    operand1: i64,
    operand2: i64,
    operator: Operator,
    correct_answer: i64,
    display_text: String,
}

impl Problem {
    /// Build a problem from its operands, computing the answer.
    ///
    /// # Errors
    ///
    /// Returns `ProblemError` if the operands violate the operator's invariant.
    pub fn new(operand1: i64, operand2: i64, operator: Operator) -> Result<Self, ProblemError> {
        match operator {
            Operator::Subtract if operand1 < operand2 => {
                return Err(ProblemError::NegativeDifference { operand1, operand2 });
            }
            Operator::Divide if operand2 == 0 => return Err(ProblemError::ZeroDivisor),
            Operator::Divide if operand1.checked_rem(operand2) != Some(0) => {
                return Err(ProblemError::InexactDivision { operand1, operand2 });
            }
            _ => {}
        }
        let correct_answer = operator
            .apply(operand1, operand2)
            .ok_or(ProblemError::Overflow)?;
        Ok(Self::from_parts(operand1, operand2, operator, correct_answer))
    }

    /// Assemble a problem whose invariants the caller has already established.
    pub(crate) fn from_parts(
        operand1: i64,
        operand2: i64,
        operator: Operator,
        correct_answer: i64,
    ) -> Self {
        Self {
            operand1,
            operand2,
            operator,
            correct_answer,
            display_text: format!("{operand1} {} {operand2}", operator.symbol()),
        }
    }

    #[must_use]
    pub fn operand1(&self) -> i64 {
        self.operand1
    }

    #[must_use]
    pub fn operand2(&self) -> i64 {
        self.operand2
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn correct_answer(&self) -> i64 {
        self.correct_answer
    }

    /// Rendered question text, e.g. `"7 × 8"`.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    #[must_use]
    pub fn is_correct(&self, answer: Option<i64>) -> bool {
        answer == Some(self.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_computes_answer_and_text() {
        let problem = Problem::new(56, 8, Operator::Divide).unwrap();
        assert_eq!(problem.correct_answer(), 7);
        assert_eq!(problem.display_text(), "56 ÷ 8");
    }

    #[test]
    fn new_rejects_invariant_violations() {
        assert_eq!(
            Problem::new(3, 5, Operator::Subtract).unwrap_err(),
            ProblemError::NegativeDifference {
                operand1: 3,
                operand2: 5
            }
        );
        assert_eq!(
            Problem::new(3, 0, Operator::Divide).unwrap_err(),
            ProblemError::ZeroDivisor
        );
        assert!(matches!(
            Problem::new(7, 2, Operator::Divide),
            Err(ProblemError::InexactDivision { .. })
        ));
    }

    #[test]
    fn missing_answer_is_never_correct() {
        let problem = Problem::new(0, 0, Operator::Add).unwrap();
        assert!(problem.is_correct(Some(0)));
        assert!(!problem.is_correct(None));
    }
}
