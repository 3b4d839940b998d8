//! Application validators
//!
//! Input validation for application operations.

pub mod message_validator;

pub use message_validator::{DEFAULT_MAX_MESSAGE_LENGTH, MessageValidator};
