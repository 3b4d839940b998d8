//! Error types for Bazaar

use thiserror::Error;

/// Result type alias using Bazaar's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Stored data could not be parsed: {0}")]
    Parse(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::DatabaseError(_) => "E400",
            Self::Parse(_) => "E401",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::DatabaseError(_) | Self::Parse(_) => Some("bazaar doctor".to_string()),
            _ => None,
        }
    }

    /// Whether this error is a unique-constraint violation reported by the store
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::DatabaseError(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_code() {
        let error = Error::DatabaseError(sqlx::Error::RowNotFound);
        assert_eq!(error.code(), "E400");
        assert_eq!(error.suggestion(), Some("bazaar doctor".to_string()));
        assert!(!error.is_unique_violation());
    }

    #[test]
    fn test_parse_error() {
        let error = Error::Parse("Invalid message ID".to_string());
        assert_eq!(error.code(), "E401");
        assert!(error.to_string().contains("Invalid message ID"));
    }

    #[test]
    fn test_io_error_is_generic() {
        let error: Error = std::io::Error::other("disk full").into();
        assert_eq!(error.code(), "E9999");
        assert_eq!(error.suggestion(), None);
        assert!(error.to_string().contains("disk full"));
    }
}
