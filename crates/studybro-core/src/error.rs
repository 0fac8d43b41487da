//! Error types for the StudyBro workspace.

use crate::doubt::OperationKind;
use thiserror::Error;

/// A shared error type for the entire StudyBro application.
///
/// Provider failures, storage failures and session-guard rejections all flow
/// through this enum so callers can decide which ones are fatal to the
/// operation and which ones are suppressed.
#[derive(Error, Debug, Clone)]
pub enum StudyError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", "base64"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input (e.g. an empty class)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport or provider-side failure
    #[error("Provider error{}: {message}", .status_code.map(|c| format!(" ({c})")).unwrap_or_default())]
    Provider {
        status_code: Option<u16>,
        message: String,
    },

    /// Another operation is already running in this session
    #[error("Operation rejected: {running} is already in progress")]
    Busy { running: OperationKind },

    /// A long-running generation job did not finish within its poll budget
    #[error("Generation timed out after {attempts} status checks")]
    GenerationTimedOut { attempts: u32 },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Provider error
    pub fn provider(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider {
            status_code,
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a provider error
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }

    /// Check if this error is a guard rejection
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// Check if this error is a poll-budget exhaustion
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::GenerationTimedOut { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StudyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StudyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StudyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StudyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<base64::DecodeError> for StudyError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Serialization {
            format: "base64".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, StudyError>`.
pub type Result<T> = std::result::Result<T, StudyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display_includes_status() {
        let err = StudyError::provider(Some(429), "RESOURCE_EXHAUSTED: quota");
        assert_eq!(
            err.to_string(),
            "Provider error (429): RESOURCE_EXHAUSTED: quota"
        );

        let err = StudyError::provider(None, "connection reset");
        assert_eq!(err.to_string(), "Provider error: connection reset");
    }

    #[test]
    fn test_busy_error_names_running_operation() {
        let err = StudyError::Busy {
            running: OperationKind::GeneratingImage,
        };
        assert!(err.is_busy());
        assert!(err.to_string().contains("diagram generation"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StudyError = io.into();
        assert!(matches!(err, StudyError::Io { .. }));
        assert!(err.to_string().contains("NotFound"));
    }
}
