//! Error type for alert configuration and engine invocation.

use brandwatch_core::BrandwatchError;

/// Errors that can occur while configuring or running the alert engine.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Configuration validation error (e.g. ratio out of range, wrong kind).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error raised by the catalog layer, including caller contract violations.
    #[error(transparent)]
    Core(#[from] BrandwatchError),
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
