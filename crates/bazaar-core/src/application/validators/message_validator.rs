//! Message validation
//!
//! Validates chat message content before it reaches the store.

use crate::application::errors::{AppResult, ApplicationError};

/// Default upper bound on message content, in characters
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 2000;

/// Validator for chat message content
#[derive(Debug, Clone, Copy)]
pub struct MessageValidator {
    max_length: usize,
}

impl Default for MessageValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE_LENGTH)
    }
}

impl MessageValidator {
    /// Create a validator with the given character limit
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// The configured character limit
    #[cfg(test)]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Validate message content
    ///
    /// Rules:
    /// - Must contain something other than whitespace
    /// - Must be at most `max_length` characters (not bytes)
    pub fn validate_content(&self, content: &str) -> AppResult<()> {
        if content.trim().is_empty() {
            return Err(ApplicationError::validation(
                "content",
                "Message content cannot be empty",
            ));
        }

        if content.chars().count() > self.max_length {
            return Err(ApplicationError::validation(
                "content",
                format!(
                    "Message content must be {} characters or less",
                    self.max_length
                ),
            ));
        }

        Ok(())
    }
}
