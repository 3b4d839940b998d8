//! Application layer
//!
//! Error taxonomy and input validation shared by the chat services.

pub mod errors;
pub mod validators;

pub use errors::{AppResult, ApplicationError};
pub use validators::{DEFAULT_MAX_MESSAGE_LENGTH, MessageValidator};
