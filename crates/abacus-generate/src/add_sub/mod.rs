//! Add/subtract chains built by simulating the abacus rod by rod.
//!
//! Each operand is composed from the ones rod upward. On every rod the digit
//! currently showing (after carry or borrow from the rods below) selects the
//! operand digits the scenario allows, so a whole chain only ever exercises
//! the bead movements that scenario teaches.

mod tables;

use rand::{Rng, RngCore};
use tracing::{debug, warn};

use abacus_core::{AddSubSettings, OperationSettings, Question, Scenario};

use crate::errors::GenerationError;
use crate::validate_operation;

/// Candidate operands collected before one is picked.
const CANDIDATE_TARGET: usize = 15;
const CANDIDATE_ATTEMPTS: usize = CANDIDATE_TARGET * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Add,
    Subtract,
}

#[derive(Debug, Clone, Copy)]
struct ChainParams {
    scenario: Scenario,
    weighting: u32,
    min_terms: u32,
    max_terms: u32,
    min_digits: u32,
    max_digits: u32,
}

impl ChainParams {
    fn from_settings(settings: &AddSubSettings) -> Result<Self, GenerationError> {
        let scenario = settings
            .add_sub_scenario
            .and_then(Scenario::new)
            .ok_or_else(|| {
                GenerationError::InvalidSettings(
                    "add_sub_scenario must be set to a value in 1..=10".to_string(),
                )
            })?;

        Ok(Self {
            scenario,
            weighting: settings.add_sub_weighting_multiplier,
            min_terms: settings.min_add_sub_terms,
            max_terms: settings.max_add_sub_terms,
            min_digits: settings.min_add_sub_term_digits,
            max_digits: settings.max_add_sub_term_digits,
        })
    }
}

/// Generate a chain of operands whose running total never drops below zero.
pub fn generate_addition_subtraction_question(
    settings: &AddSubSettings,
    rng: &mut dyn RngCore,
) -> Result<Question, GenerationError> {
    validate_operation(OperationSettings::AddSubtract(settings.clone()))?;
    let params = ChainParams::from_settings(settings)?;

    let first_digits = rng.random_range(params.min_digits..=params.max_digits);
    let first = first_operand(&params, first_digits, rng)?;

    let mut operands = vec![first];
    let mut running_total = first;
    let terms = rng.random_range(params.min_terms..=params.max_terms);

    for _ in 1..terms {
        let digits = rng.random_range(params.min_digits..=params.max_digits);
        let next = next_operand(&params, running_total, digits, rng)?;
        operands.push(next);
        running_total += next;
        if running_total < 0 {
            return Err(GenerationError::Invariant(format!(
                "running total became {running_total} after operands {operands:?} in scenario {}",
                params.scenario
            )));
        }
    }

    Ok(Question::add_subtract(operands))
}

fn first_operand(
    params: &ChainParams,
    digits: u32,
    rng: &mut dyn RngCore,
) -> Result<i64, GenerationError> {
    for d in (params.min_digits..=digits).rev() {
        let candidates: Vec<i64> = candidate_operands(params, 0, d, rng)
            .into_iter()
            .filter(|operand| *operand > 0)
            .collect();
        if let Some(first) = pick(rng, &candidates) {
            return Ok(first);
        }
        debug!(scenario = params.scenario.id(), digits = d, "no first operand at digit count");
    }

    single_digit_first_operand(params, rng)
}

/// Last resort for the first operand: one digit the empty abacus allows.
fn single_digit_first_operand(
    params: &ChainParams,
    rng: &mut dyn RngCore,
) -> Result<i64, GenerationError> {
    let singles: Vec<i64> = weighted_digits(params, Operation::Add, 0, 0, 0)
        .into_iter()
        .filter(|digit| *digit > 0)
        .map(i64::from)
        .collect();
    warn!(
        scenario = params.scenario.id(),
        min_digits = params.min_digits,
        max_digits = params.max_digits,
        "falling back to a single-digit first operand"
    );
    pick(rng, &singles).ok_or_else(|| {
        GenerationError::Exhausted(format!(
            "scenario {} has no starting digit for an empty abacus",
            params.scenario
        ))
    })
}

fn next_operand(
    params: &ChainParams,
    running_total: i64,
    digits: u32,
    rng: &mut dyn RngCore,
) -> Result<i64, GenerationError> {
    let candidates = candidate_operands(params, running_total, digits, rng);
    if let Some(next) = pick(rng, &candidates) {
        return Ok(next);
    }

    for d in (params.min_digits..digits).rev() {
        debug!(
            scenario = params.scenario.id(),
            running_total,
            digits = d,
            "retrying operand with fewer digits"
        );
        let candidates = candidate_operands(params, running_total, d, rng);
        if let Some(next) = pick(rng, &candidates) {
            return Ok(next);
        }
    }

    Err(GenerationError::Exhausted(format!(
        "no operand follows running total {running_total} in scenario {} (digits: {digits}, weighting: {})",
        params.scenario, params.weighting
    )))
}

/// Signed operands that may follow `running_total`, sampled add or subtract
/// in proportion to how many digits each allows on the ones rod.
fn candidate_operands(
    params: &ChainParams,
    running_total: i64,
    digits: u32,
    rng: &mut dyn RngCore,
) -> Vec<i64> {
    let ones = digit_at(running_total, 0);
    let add_options = weighted_digits(params, Operation::Add, ones, running_total, 0).len();
    let sub_options = weighted_digits(params, Operation::Subtract, ones, running_total, 0)
        .into_iter()
        .filter(|d2| ones >= *d2 || params.scenario.borrows_across_rods())
        .count();

    if add_options == 0 && sub_options == 0 {
        return Vec::new();
    }
    let prob_add = add_options as f64 / (add_options + sub_options) as f64;

    let mut candidates = Vec::with_capacity(CANDIDATE_TARGET);
    let mut attempts = 0;
    while candidates.len() < CANDIDATE_TARGET && attempts < CANDIDATE_ATTEMPTS {
        attempts += 1;
        let add = rng.random::<f64>() < prob_add;
        if add && add_options > 0 {
            if let Some(operand) = build_operand(params, Operation::Add, running_total, digits, rng)
            {
                candidates.push(operand);
            }
        } else if !add && sub_options > 0 {
            if let Some(operand) =
                build_operand(params, Operation::Subtract, running_total, digits, rng)
            {
                if running_total - operand >= 0 {
                    candidates.push(-operand);
                }
            }
        }
    }
    candidates
}

/// Compose one operand of `digits` digits, ones rod first. Returns its
/// absolute value, or `None` when some rod has no permitted digit.
fn build_operand(
    params: &ChainParams,
    operation: Operation,
    running_total: i64,
    digits: u32,
    rng: &mut dyn RngCore,
) -> Option<i64> {
    let mut value = 0_i64;
    let mut carry = 0_i64;
    let mut place = 1_i64;

    for column in 0..digits {
        let rod = i64::from(digit_at(running_total, column));
        let d1 = match operation {
            Operation::Add => (rod + carry) % 10,
            Operation::Subtract => (rod - carry).rem_euclid(10),
        };
        let d1 = u8::try_from(d1).ok()?;

        let options = weighted_digits(params, operation, d1, running_total, column);
        let mut digit = pick(rng, &options)?;
        if column == digits - 1 && digit == 0 && digits > 1 {
            let non_zero: Vec<u8> = options.into_iter().filter(|d| *d != 0).collect();
            digit = pick(rng, &non_zero)?;
        }

        let digit = i64::from(digit);
        value += digit * place;
        carry = match operation {
            Operation::Add => (rod + carry + digit) / 10,
            Operation::Subtract => i64::from(rod - carry - digit < 0),
        };
        place *= 10;
    }

    (value > 0).then_some(value)
}

/// Operand digits allowed on a rod showing `d1`, with weightable digits
/// repeated so they are drawn `weighting` times as often.
fn weighted_digits(
    params: &ChainParams,
    operation: Operation,
    d1: u8,
    running_total: i64,
    column: u32,
) -> Vec<u8> {
    let mut base: Vec<u8> = tables::valid_digits(params.scenario, operation, d1).to_vec();

    // Without a higher rod to borrow from, the rod cannot go below zero.
    if operation == Operation::Subtract
        && params.scenario.borrows_across_rods()
        && running_total < 10_i64.pow(column + 1)
    {
        base.retain(|d2| *d2 <= d1);
    }
    if base.is_empty() {
        return base;
    }

    let mut weighted = base.clone();
    if params.weighting > 1 {
        for digit in tables::weightable_digits(params.scenario, operation, d1) {
            if base.contains(digit) {
                weighted.extend(std::iter::repeat_n(*digit, (params.weighting - 1) as usize));
            }
        }
    }
    weighted
}

fn digit_at(value: i64, column: u32) -> u8 {
    let digit = (value.unsigned_abs() / 10_u64.pow(column)) % 10;
    digit as u8
}

fn pick<T: Copy>(rng: &mut dyn RngCore, items: &[T]) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len())).copied()
}
