//! Domain layer
//!
//! Contains the core business logic and domain models.

pub mod chat;
pub mod listing;
pub mod notification;
