use thiserror::Error;

/// Core error type shared across the abacus crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings are missing a required field or carry an impossible range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    /// The operation type is unknown and no legacy fields were present.
    #[error("unsupported operation type: {0}")]
    UnsupportedOperation(String),
    /// Settings JSON could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by the abacus crates.
pub type Result<T> = std::result::Result<T, Error>;
