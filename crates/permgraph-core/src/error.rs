//! Error types for permgraph core.

use thiserror::Error;

/// Errors raised while building keys, definitions or descriptors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("permission key is empty")]
    EmptyKey,

    #[error("unknown permission default: {0}")]
    UnknownDefault(String),

    #[error("invalid child declaration for {key}: {reason}")]
    InvalidChild { key: String, reason: String },

    #[error("descriptor error: {0}")]
    Descriptor(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
