//! Error types for board operations
//!
//! Most board paths never fail: missing ids are no-ops and empty
//! aggregations yield zero. What remains is classified by who can fix it:
//! - Input: a caller supplied an incomplete or conflicting record
//! - Configuration: the config file could not be read or parsed

use std::path::PathBuf;
use thiserror::Error;

/// Error types for board operations
#[derive(Debug, Error)]
pub enum BoardError {
    // Input errors
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Duplicate entity id: {0}")]
    DuplicateId(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    // Configuration errors
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to read config {path}: {message}")]
    ConfigRead { path: PathBuf, message: String },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl BoardError {
    /// Returns true if the caller can fix this by changing its input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            BoardError::MissingField(_)
                | BoardError::DuplicateId(_)
                | BoardError::UnknownScenario(_)
        )
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BoardError::MissingField(_) => "Fill in the required fields and save again.",
            BoardError::DuplicateId(_) => "Create the record again to get a fresh id.",
            BoardError::UnknownScenario(_) => "Use one of: reset, mock_full, mock_stalled",
            BoardError::HomeDirNotFound => "Set the HOME environment variable.",
            BoardError::ConfigRead { .. } => "Check permissions on ~/.salesboard/config.json",
            BoardError::ConfigParse(_) => "Fix or delete ~/.salesboard/config.json",
        }
    }
}

/// Serializable error representation for the presentation layer
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Input,
    Configuration,
}

impl From<&BoardError> for ErrorPayload {
    fn from(err: &BoardError) -> Self {
        let error_type = if err.is_input_error() {
            ErrorType::Input
        } else {
            ErrorType::Configuration
        };

        ErrorPayload {
            message: err.to_string(),
            error_type,
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_payload() {
        let err = BoardError::MissingField("name");
        let payload = ErrorPayload::from(&err);
        assert_eq!(payload.message, "Missing required field: name");
        assert_eq!(payload.error_type, ErrorType::Input);
    }

    #[test]
    fn test_parse_error_is_configuration() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = BoardError::from(parse_err);
        assert!(!err.is_input_error());
        let json = serde_json::to_value(ErrorPayload::from(&err)).unwrap();
        assert_eq!(json["errorType"], "configuration");
    }
}
