//! Notification domain module
//!
//! Per-user notifications; one is recorded for the recipient of every chat
//! message.

pub mod entity;
pub mod repository;
pub mod service;

pub use entity::Notification;
pub use repository::NotificationRepository;
pub use service::NotificationService;
