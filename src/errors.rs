//! Error types for the Probe Dock model crate.
//!
//! This module defines the error enumeration returned by the model factories
//! and by the configuration loader. It integrates with `thiserror` to provide
//! `Display` implementations and error source chaining where applicable.
//!
//! Notes:
//! - The invalid-argument variants carry fixed messages. Existing callers
//!   compare these strings, so they must not change.
//! - The remaining variants cover (de)serialization and I/O failures.

use thiserror::Error;

#[derive(Error, Debug)]
/// Unified error enumeration for the Probe Dock model library.
///
/// - Returned by `factory` functions when a mandatory field is missing or invalid.
/// - Returned by `config` when a configuration file cannot be read or parsed.
/// - Implements `std::error::Error` via `thiserror`.
pub enum ModelError {
    /// A test result was built without a fingerprint.
    #[error("The fingerprint is mandatory.")]
    FingerprintMandatory,

    /// A test result was built with a negative duration.
    #[error("The duration cannot be negative.")]
    NegativeDuration,

    /// A test run was built without an execution context.
    #[error("Execution context must be present.")]
    MissingContext,

    /// A test run was built without probe information.
    #[error("Probe info must be present.")]
    MissingProbe,

    /// A test run was built with a missing or blank project ID.
    #[error("The project ID must be present.")]
    MissingProjectId,

    /// A test run was built with a missing or blank project version.
    #[error("The project version must be present.")]
    MissingProjectVersion,

    /// Malformed model payload (JSON encode/decode failure).
    #[error("Error decode in the model, info: {0}")]
    InvalidModelInfo(String),

    /// I/O error while reading a configuration source.
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
}

impl ModelError {
    /// Whether the error is one of the argument validation failures raised
    /// by the factories, as opposed to a serialization or I/O failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            ModelError::FingerprintMandatory
                | ModelError::NegativeDuration
                | ModelError::MissingContext
                | ModelError::MissingProbe
                | ModelError::MissingProjectId
                | ModelError::MissingProjectVersion
        )
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::InvalidModelInfo(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_verbatim() {
        assert_eq!(
            ModelError::FingerprintMandatory.to_string(),
            "The fingerprint is mandatory."
        );
        assert_eq!(
            ModelError::NegativeDuration.to_string(),
            "The duration cannot be negative."
        );
        assert_eq!(
            ModelError::MissingContext.to_string(),
            "Execution context must be present."
        );
        assert_eq!(ModelError::MissingProbe.to_string(), "Probe info must be present.");
        assert_eq!(
            ModelError::MissingProjectId.to_string(),
            "The project ID must be present."
        );
        assert_eq!(
            ModelError::MissingProjectVersion.to_string(),
            "The project version must be present."
        );
    }

    #[test]
    fn test_invalid_argument_grouping() {
        assert!(ModelError::MissingProbe.is_invalid_argument());
        assert!(!ModelError::InvalidModelInfo("eof".to_string()).is_invalid_argument());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!ModelError::from(io).is_invalid_argument());
    }
}
