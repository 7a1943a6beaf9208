use rand::{Rng, RngCore};
use tracing::warn;

use abacus_core::{
    MultiplySettings, OperationSettings, Question, RuleChar, TimesTable, parse_rule_set,
};

use crate::errors::GenerationError;
use crate::validate_operation;

/// Candidate pairs drawn before giving up on a rule.
pub const MULTIPLY_ATTEMPTS: u32 = 2000;

/// Generate a multiplication whose digit-pair products follow the rule.
///
/// Digit `i` of the multiplicand times digit `j` of the multiplier (both
/// counted from the most significant digit) must satisfy character `i` of
/// rule part `j`. Unsatisfiable rules yield `0 x 0` flagged as a fallback.
pub fn generate_multiplication_question(
    settings: &MultiplySettings,
    rng: &mut dyn RngCore,
) -> Result<Question, GenerationError> {
    validate_operation(OperationSettings::Multiply(settings.clone()))?;

    if let Some(table) = &settings.times_table {
        return times_table_question(table, rng);
    }

    let rules = rule_grid(settings)?;
    let Some(first_part) = rules.first() else {
        return Err(GenerationError::InvalidSettings(
            "multiply rules have no parts".to_string(),
        ));
    };

    for _ in 0..MULTIPLY_ATTEMPTS {
        let multiplicand = multiplicand_digits(first_part, rng);
        let multiplier = multiplier_digits(rules.len(), rng);
        if satisfies(&rules, &multiplicand, &multiplier) {
            return multiply_question(to_number(&multiplicand), to_number(&multiplier));
        }
    }

    warn!(
        rules = %describe(&rules),
        attempts = MULTIPLY_ATTEMPTS,
        "no multiplication satisfied the rules, using 0 x 0"
    );
    Ok(multiply_question(Some(0), Some(0))?.into_fallback())
}

fn times_table_question(
    table: &TimesTable,
    rng: &mut dyn RngCore,
) -> Result<Question, GenerationError> {
    let multiplicand = rng.random_range(table.term1_min..=table.term1_max);
    let multiplier = rng.random_range(table.term2_min..=table.term2_max);
    multiply_question(Some(i64::from(multiplicand)), Some(i64::from(multiplier)))
}

/// Validation bounds factor sizes, so an overflow here is an invariant breach.
fn multiply_question(
    multiplicand: Option<i64>,
    multiplier: Option<i64>,
) -> Result<Question, GenerationError> {
    multiplicand
        .zip(multiplier)
        .and_then(|(x, y)| Question::multiply(x, y))
        .ok_or_else(|| {
            GenerationError::Invariant(format!(
                "multiplication {multiplicand:?} x {multiplier:?} overflows i64"
            ))
        })
}

/// One row per multiplier digit, one column per multiplicand digit.
fn rule_grid(settings: &MultiplySettings) -> Result<Vec<Vec<RuleChar>>, GenerationError> {
    let parts = match (&settings.processed_rules, &settings.rule_string) {
        (Some(parts), _) => parts.clone(),
        (None, Some(rule)) => parse_rule_set(rule)
            .map(|rules| rules.checked_parts())
            .ok_or_else(|| {
                GenerationError::InvalidSettings(format!("rule string '{rule}' is not valid"))
            })?,
        (None, None) => {
            return Err(GenerationError::InvalidSettings(
                "multiply settings need processed_rules or rule_string".to_string(),
            ));
        }
    };

    parts
        .iter()
        .map(|part| {
            RuleChar::decode_part(part).ok_or_else(|| {
                GenerationError::InvalidSettings(format!("rule part '{part}' is not valid"))
            })
        })
        .collect()
}

/// Zero-pattern positions are fixed to 0; every other digit is 1..=9.
fn multiplicand_digits(pattern: &[RuleChar], rng: &mut dyn RngCore) -> Vec<u8> {
    pattern
        .iter()
        .map(|ch| match ch {
            RuleChar::Zero => 0,
            _ => rng.random_range(1..=9),
        })
        .collect()
}

fn multiplier_digits(len: usize, rng: &mut dyn RngCore) -> Vec<u8> {
    (0..len)
        .map(|idx| {
            if idx == 0 {
                rng.random_range(1..=9)
            } else {
                rng.random_range(0..=9)
            }
        })
        .collect()
}

fn satisfies(rules: &[Vec<RuleChar>], multiplicand: &[u8], multiplier: &[u8]) -> bool {
    rules.iter().zip(multiplier).all(|(part, y)| {
        part.iter()
            .zip(multiplicand)
            .all(|(ch, x)| ch.accepts(u32::from(*x) * u32::from(*y)))
    })
}

/// `None` when the digits do not fit in an `i64`.
fn to_number(digits: &[u8]) -> Option<i64> {
    digits.iter().try_fold(0_i64, |acc, digit| {
        acc.checked_mul(10)?.checked_add(i64::from(*digit))
    })
}

fn describe(rules: &[Vec<RuleChar>]) -> String {
    rules
        .iter()
        .map(|part| part.iter().map(|ch| ch.as_char()).collect::<String>())
        .collect::<Vec<_>>()
        .join(" + ")
}
