//! Error types shared by the codec, the engine and the gradient checker.

use thiserror::Error;

/// Errors surfaced at call boundaries.
///
/// Shape problems are detected before any matrix operation runs. Numeric
/// problems (a cost of `inf` when a true-label probability underflows to zero)
/// are reported instead of being clamped.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Dimension or length mismatch between dims, parameters, data and labels.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Non-finite value encountered in inputs or in the computed cost.
    #[error("non-finite value: {0}")]
    Numeric(String),

    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;

impl NetworkError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        NetworkError::Shape(msg.into())
    }

    pub(crate) fn numeric(msg: impl Into<String>) -> Self {
        NetworkError::Numeric(msg.into())
    }
}
