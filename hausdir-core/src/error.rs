//! Error types for hausdir.

use thiserror::Error;

/// Errors that can occur in hausdir operations.
///
/// Lookups that find nothing are not errors; they return `None`.
#[derive(Error, Debug)]
pub enum HausdirError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Malformed task file {path}: {reason}")]
    Structure { path: String, reason: String },

    #[error("Reference data parse error: {0}")]
    DatasetParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for hausdir operations.
pub type HausdirResult<T> = Result<T, HausdirError>;
