//! Listing lookups
//!
//! Users and products belong to other parts of the marketplace; the chat
//! slice reads them to resolve listing owners and display names.

pub mod entity;
pub mod repository;

pub use entity::{Product, UNKNOWN_USER_NAME, User};
pub use repository::{ProductRepository, UserRepository};
