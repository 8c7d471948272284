//! # envguard Errors
//!
//! Error handling for the environment contract checker.
//!
//! - Uses `thiserror` for structured error definitions
//! - Named fields in every variant so messages stay stable and greppable

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading and checking an environment contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// One or more declared keys are absent, or empty under the strict policy.
    ///
    /// `keys` is in declaration order and lists every violator.
    #[error("Missing environment variables: {}", keys.join(", "))]
    MissingVariables { keys: Vec<String> },

    #[error("Sample file not found: {}", path.display())]
    SampleNotFound { path: PathBuf },

    #[error("Malformed line in {}: {reason}", path.display())]
    MalformedFile { path: PathBuf, reason: String },

    #[error("Invalid options: {message}")]
    InvalidOptions { message: String },
}

impl ContractError {
    /// The violating keys, when this is a contract violation.
    pub fn missing_keys(&self) -> Option<&[String]> {
        match self {
            ContractError::MissingVariables { keys } => Some(keys),
            _ => None,
        }
    }
}
