//! Question generators for abacus practice.
//!
//! Every generator takes its settings and an injected random source; identical
//! seeds give identical questions. The worksheet engine batches generator
//! calls over a single seeded stream.

pub mod add_sub;
pub mod dispatch;
pub mod divide;
pub mod engine;
pub mod errors;
pub mod model;
pub mod multiply;
pub mod rng;

use abacus_core::{OperationSettings, QuestionSettings, validate_settings};

pub use add_sub::generate_addition_subtraction_question;
pub use dispatch::{generate_question, generate_question_from_json};
pub use divide::{DIVIDE_ATTEMPTS, generate_division_question};
pub use engine::WorksheetEngine;
pub use errors::GenerationError;
pub use model::{GenerationIssue, Worksheet, WorksheetOptions, WorksheetReport};
pub use multiply::{MULTIPLY_ATTEMPTS, generate_multiplication_question};
pub use rng::{hash_seed, rng_from_seed};

fn validate_operation(operation: OperationSettings) -> Result<(), GenerationError> {
    validate_settings(&QuestionSettings::new(operation))?;
    Ok(())
}
