//! Error types for the permission map.

use permgraph_core::CoreError;
use thiserror::Error;

/// Errors that can occur during permission map operations.
#[derive(Debug, Error)]
pub enum MapError {
    /// A required argument was missing or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Strict key mode: the registration key differs from the definition's.
    #[error("key {key} does not match definition key {definition}")]
    KeyMismatch { key: String, definition: String },

    /// Core error (descriptor parsing, key validation).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[source] serde_json::Error),

    /// I/O error while reading a descriptor.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for permission map operations.
pub type Result<T> = std::result::Result<T, MapError>;
