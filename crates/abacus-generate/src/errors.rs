use thiserror::Error;

use crate::model::WorksheetReport;

/// Errors emitted by the question generators and the worksheet engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Settings(#[from] abacus_core::Error),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    /// No operand could be formed after every digit-count fallback.
    #[error("generation exhausted: {0}")]
    Exhausted(String),
    /// A generated value broke an invariant the tables should guarantee.
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("worksheet generation failed")]
    Failed(WorksheetReport),
}
