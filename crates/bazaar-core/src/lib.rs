//! Bazaar Core Library
//!
//! Chat between buyers and sellers of marketplace listings:
//! - Storage (SQLite connection pool and schema migrations)
//! - Chat rooms, one per product and buyer
//! - Messages with read tracking and unread counts
//! - Notifications for message recipients
//! - Configuration

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::application::{AppResult, ApplicationError};
    pub use crate::config::Config;
    pub use crate::domain::chat::{ChatRoomService, MessageService};
    pub use crate::domain::notification::NotificationService;
    pub use crate::error::{Error, Result};
    pub use crate::storage::Database;
}
