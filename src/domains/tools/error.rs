//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur during tool registration, lookup and execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool '{0}' not found")]
    NotFound(String),

    /// A tool with the same name is already registered.
    #[error("Tool '{0}' is already registered")]
    DuplicateName(String),

    /// Required parameters are absent from the request.
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    /// Parameters are present but of the wrong shape.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The referenced property does not exist.
    #[error("Property with ID {0} not found")]
    PropertyNotFound(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Whether the caller sent a request that cannot be executed as-is.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::MissingParameters(_))
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ToolError::not_found("nope").to_string(),
            "Tool 'nope' not found"
        );
        assert_eq!(
            ToolError::PropertyNotFound("prop-999".into()).to_string(),
            "Property with ID prop-999 not found"
        );
        assert_eq!(
            ToolError::MissingParameters(vec!["a".into(), "b".into()]).to_string(),
            "Missing required parameters: a, b"
        );
    }

    #[test]
    fn test_bad_request_classification() {
        assert!(ToolError::MissingParameters(vec![]).is_bad_request());
        assert!(!ToolError::PropertyNotFound("x".into()).is_bad_request());
        assert!(!ToolError::invalid_arguments("x").is_bad_request());
    }
}
