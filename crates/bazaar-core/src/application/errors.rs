//! Application layer errors
//!
//! The request-facing error taxonomy returned by the chat services.

use std::fmt;

use crate::error::Error;

/// Application layer error types
#[derive(Debug)]
pub enum ApplicationError {
    /// Bad input shape or length
    Validation { field: String, message: String },
    /// Entity absent, or hidden from a caller who may not see it
    NotFound { entity: String, id: String },
    /// Authenticated caller who is not allowed to act on the resource
    Forbidden { resource: String, action: String },
    /// Concurrent write lost a uniqueness race
    Conflict { entity: String, detail: String },
    /// Operation that is never allowed for this caller, e.g. chatting about own listing
    InvalidOperation { message: String },
    /// Unexpected infrastructure failure
    Domain(Error),
}

impl ApplicationError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Forbidden {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(entity: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
            detail: detail.into(),
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::Forbidden { .. } => "forbidden",
            Self::Conflict { .. } => "conflict",
            Self::InvalidOperation { .. } => "invalid_operation",
            Self::Domain(_) => "internal_error",
        }
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "Validation error for '{}': {}", field, message)
            }
            Self::NotFound { entity, id } => {
                write!(f, "{} with id '{}' not found", entity, id)
            }
            Self::Forbidden { resource, action } => {
                write!(f, "Not allowed to {} {}", action, resource)
            }
            Self::Conflict { entity, detail } => {
                write!(f, "{} conflict: {}", entity, detail)
            }
            Self::InvalidOperation { message } => write!(f, "{}", message),
            Self::Domain(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApplicationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for ApplicationError {
    fn from(error: Error) -> Self {
        Self::Domain(error)
    }
}

impl From<sqlx::Error> for ApplicationError {
    fn from(error: sqlx::Error) -> Self {
        Self::Domain(Error::DatabaseError(error))
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = ApplicationError::validation("content", "must not be empty");
        assert!(err.to_string().contains("content"));
        assert!(err.to_string().contains("must not be empty"));
        assert_eq!(err.kind(), "validation_error");
    }

    #[test]
    fn test_not_found_error() {
        let err = ApplicationError::not_found("ChatRoom", "123");
        assert!(err.to_string().contains("ChatRoom"));
        assert!(err.to_string().contains("123"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_forbidden_error() {
        let err = ApplicationError::forbidden("chat room", "send messages to");
        assert_eq!(err.to_string(), "Not allowed to send messages to chat room");
    }

    #[test]
    fn test_invalid_operation_message_is_verbatim() {
        let err = ApplicationError::invalid_operation("Cannot chat about your own listing");
        assert_eq!(err.to_string(), "Cannot chat about your own listing");
        assert_eq!(err.kind(), "invalid_operation");
    }

    #[test]
    fn test_domain_error_wraps_source() {
        let err: ApplicationError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind(), "internal_error");
        assert!(std::error::Error::source(&err).is_some());
    }
}
