use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{GameSettings, NumberRange, Operator, Problem, SettingsError};

/// Operator assignment before shuffling: the i-th problem uses
/// `operations[i % operations.len()]`.
///
/// Counts per operator differ by at most one for any `count`.
#[must_use]
pub fn operator_plan(operations: &[Operator], count: usize) -> Vec<Operator> {
    if operations.is_empty() {
        return Vec::new();
    }
    operations.iter().copied().cycle().take(count).collect()
}

//
// ─── GENERATOR ─────────────────────────────────────────────────────────────────
//

/// Produces shuffled problem sets from `GameSettings`.
///
/// Generic over the RNG so tests can seed it.
#[derive(Debug, Clone)]
pub struct QuestionGenerator<R = StdRng> {
    rng: R,
}

impl QuestionGenerator<StdRng> {
    /// A generator seeded from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for QuestionGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuestionGenerator<R> {
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate exactly `settings.total_questions()` problems in random order.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the settings are invalid. Valid settings never fail.
    pub fn generate_set(&mut self, settings: &GameSettings) -> Result<Vec<Problem>, SettingsError> {
        settings.validate()?;
        let count = usize::try_from(settings.total_questions()).unwrap_or(usize::MAX);
        let range = settings.number_range();

        let mut problems: Vec<Problem> = operator_plan(settings.operations(), count)
            .into_iter()
            .map(|operator| self.generate_problem(operator, range))
            .collect();

        // Fisher-Yates, so operator order is not predictable.
        problems.shuffle(&mut self.rng);
        Ok(problems)
    }

    /// Build one problem for `operator` with operands drawn from `range`.
    pub fn generate_problem(&mut self, operator: Operator, range: NumberRange) -> Problem {
        let (min, max) = (i64::from(range.min()), i64::from(range.max()));

        match operator {
            Operator::Add => {
                let a = self.rng.random_range(min..=max);
                let b = self.rng.random_range(min..=max);
                Problem::from_parts(a, b, operator, a + b)
            }
            Operator::Subtract => {
                let a = self.rng.random_range(min..=max);
                let b = self.rng.random_range(min..=a);
                Problem::from_parts(a, b, operator, a - b)
            }
            Operator::Multiply => {
                let a = self.rng.random_range(min..=max);
                let b = self.rng.random_range(min..=max);
                Problem::from_parts(a, b, operator, a * b)
            }
            Operator::Divide => {
                // Work backwards from the answer so the division is exact.
                let low = if max >= 2 { min.max(2) } else { min };
                let mut divisor = self.rng.random_range(low..=max);
                if divisor == 0 {
                    divisor = 1;
                }
                let answer = self.rng.random_range(min..=max);
                Problem::from_parts(divisor * answer, divisor, operator, answer)
            }
        }
    }
}
