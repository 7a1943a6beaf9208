use std::ops::RangeInclusive;

use rand::{Rng, RngCore};
use tracing::warn;

use abacus_core::{DivideSettings, DivisionFormula, OperationSettings, Question};

use crate::errors::GenerationError;
use crate::validate_operation;

/// Draws per question before an archetype falls back to its fixed pair.
pub const DIVIDE_ATTEMPTS: u32 = 500;

/// Generate an exact division matching the configured archetype.
pub fn generate_division_question(
    settings: &DivideSettings,
    rng: &mut dyn RngCore,
) -> Result<Question, GenerationError> {
    validate_operation(OperationSettings::Divide(settings.clone()))?;

    let formula = settings.division_formula_type;
    let found = match formula {
        DivisionFormula::CatGtMice2D => leading_digit_pair(rng, 2..=9, &[2], |lead, cat| lead < cat),
        DivisionFormula::CatGtMice3D => leading_digit_pair(rng, 2..=9, &[3], |lead, cat| lead < cat),
        DivisionFormula::CatEqMice => {
            leading_digit_pair(rng, 2..=9, &[2, 3], |lead, cat| lead == cat)
        }
        DivisionFormula::CatLtMice2D => leading_digit_pair(rng, 2..=8, &[2], |lead, cat| lead > cat),
        DivisionFormula::AnyDigits => any_digits_pair(&AnyDigits::from_settings(settings), rng),
    };

    let (dividend, divisor, fallback) = match found {
        Some((dividend, divisor)) => (dividend, divisor, false),
        None => {
            let (dividend, divisor) = fallback_pair(settings);
            warn!(
                formula = %formula,
                attempts = DIVIDE_ATTEMPTS,
                dividend,
                divisor,
                "division archetype exhausted, using fallback pair"
            );
            (dividend, divisor, true)
        }
    };

    if divisor == 0 || dividend % divisor != 0 {
        return Err(GenerationError::Invariant(format!(
            "{formula} produced inexact division {dividend} / {divisor}"
        )));
    }

    let question = Question::divide(dividend, divisor);
    Ok(if fallback {
        question.into_fallback()
    } else {
        question
    })
}

/// Single-digit divisor archetypes: enumerate the quotients that give a
/// dividend of the drawn digit count whose leading digit passes `keep`.
fn leading_digit_pair(
    rng: &mut dyn RngCore,
    divisors: RangeInclusive<i64>,
    digit_choices: &[u32],
    keep: fn(i64, i64) -> bool,
) -> Option<(i64, i64)> {
    for _ in 0..DIVIDE_ATTEMPTS {
        let divisor = rng.random_range(divisors.clone());
        let digits = match digit_choices {
            [only] => *only,
            _ => digit_choices[rng.random_range(0..digit_choices.len())],
        };
        let (low, high) = digit_bounds(digits);
        let min_quotient = div_ceil(low, divisor);
        let max_quotient = high / divisor;
        if min_quotient > max_quotient {
            continue;
        }

        let quotients: Vec<i64> = (min_quotient..=max_quotient)
            .filter(|quotient| {
                let dividend = divisor * quotient;
                num_digits(dividend) == digits && keep(first_digit(dividend), divisor)
            })
            .collect();
        if !quotients.is_empty() {
            let quotient = quotients[rng.random_range(0..quotients.len())];
            return Some((divisor * quotient, divisor));
        }
    }
    None
}

#[derive(Debug, Clone, Copy)]
struct AnyDigits {
    divisor_digits: u32,
    dividend_min: u32,
    dividend_max: u32,
}

impl AnyDigits {
    fn from_settings(settings: &DivideSettings) -> Self {
        let divisor_digits = settings.divisor_digits.unwrap_or(1);
        let dividend_min = settings.dividend_digits_min.unwrap_or(2);
        let dividend_max = settings
            .dividend_digits_max
            .unwrap_or_else(|| (dividend_min + 1).clamp(2, 9));
        Self {
            divisor_digits,
            dividend_min,
            dividend_max,
        }
    }

    fn divisors(&self) -> RangeInclusive<i64> {
        let (low, high) = digit_bounds(self.divisor_digits);
        low.max(2)..=high
    }
}

/// The divisor is kept across draws and only redrawn on every tenth empty
/// quotient range.
fn any_digits_pair(params: &AnyDigits, rng: &mut dyn RngCore) -> Option<(i64, i64)> {
    let mut divisor = rng.random_range(params.divisors());

    for attempt in 0..DIVIDE_ATTEMPTS {
        let digits = rng.random_range(params.dividend_min..=params.dividend_max);
        let (low, high) = digit_bounds(digits);
        let min_quotient = div_ceil(low, divisor).max(2);
        let max_quotient = high / divisor;

        if min_quotient > max_quotient {
            if attempt % 10 == 0 {
                divisor = rng.random_range(params.divisors());
            }
            continue;
        }

        let dividend = divisor * rng.random_range(min_quotient..=max_quotient);
        if num_digits(dividend) == digits {
            return Some((dividend, divisor));
        }
    }
    None
}

fn fallback_pair(settings: &DivideSettings) -> (i64, i64) {
    match settings.division_formula_type {
        DivisionFormula::CatGtMice2D => (10, 2),
        DivisionFormula::CatGtMice3D => (100, 2),
        DivisionFormula::CatEqMice => (24, 2),
        DivisionFormula::CatLtMice2D => (42, 2),
        DivisionFormula::AnyDigits => {
            let params = AnyDigits::from_settings(settings);
            let divisor = *params.divisors().start();
            let (low, _) = digit_bounds(params.dividend_min);
            let quotient = div_ceil(low, divisor).max(2);
            (divisor * quotient, divisor)
        }
    }
}

/// Smallest and largest value with `digits` digits.
fn digit_bounds(digits: u32) -> (i64, i64) {
    let low = 10_i64.pow(digits.saturating_sub(1));
    (low, 10_i64.pow(digits) - 1)
}

fn div_ceil(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1) / divisor
}

fn num_digits(value: i64) -> u32 {
    value.unsigned_abs().checked_ilog10().map_or(1, |log| log + 1)
}

fn first_digit(value: i64) -> i64 {
    let magnitude = value.abs();
    magnitude / 10_i64.pow(num_digits(magnitude) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_helpers() {
        assert_eq!(num_digits(0), 1);
        assert_eq!(num_digits(9), 1);
        assert_eq!(num_digits(100), 3);
        assert_eq!(first_digit(742), 7);
        assert_eq!(digit_bounds(3), (100, 999));
        assert_eq!(div_ceil(10, 3), 4);
    }

    #[test]
    fn fallback_pairs_satisfy_their_archetype() {
        for formula in DivisionFormula::ALL {
            let (dividend, divisor) = fallback_pair(&DivideSettings::new(formula));
            assert_eq!(dividend % divisor, 0, "{formula}");
            assert!(dividend / divisor >= 2, "{formula}");
        }
    }

    #[test]
    fn any_digits_fallback_reaches_minimum_dividend_digits() {
        let settings = DivideSettings {
            division_formula_type: DivisionFormula::AnyDigits,
            divisor_digits: Some(3),
            dividend_digits_min: Some(5),
            dividend_digits_max: Some(6),
        };
        let (dividend, divisor) = fallback_pair(&settings);
        assert_eq!(divisor, 100);
        assert_eq!(dividend, 10_000);
    }
}
