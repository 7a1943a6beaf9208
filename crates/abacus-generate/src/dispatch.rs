use rand::RngCore;
use serde_json::Value;

use abacus_core::{OperationSettings, Question, QuestionSettings};

use crate::add_sub::generate_addition_subtraction_question;
use crate::divide::generate_division_question;
use crate::errors::GenerationError;
use crate::multiply::generate_multiplication_question;

/// Route settings to the generator for their operation type.
pub fn generate_question(
    settings: &QuestionSettings,
    rng: &mut dyn RngCore,
) -> Result<Question, GenerationError> {
    match &settings.operation {
        OperationSettings::AddSubtract(add_sub) => {
            generate_addition_subtraction_question(add_sub, rng)
        }
        OperationSettings::Multiply(multiply) => generate_multiplication_question(multiply, rng),
        OperationSettings::Divide(divide) => generate_division_question(divide, rng),
    }
}

/// Decode loosely typed settings and dispatch them.
///
/// Unknown operation types fail with an unsupported-operation error unless
/// legacy add/subtract fields are present.
pub fn generate_question_from_json(
    settings: Value,
    rng: &mut dyn RngCore,
) -> Result<Question, GenerationError> {
    let settings = QuestionSettings::from_json_value(settings)?;
    generate_question(&settings, rng)
}
