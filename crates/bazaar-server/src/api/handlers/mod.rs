//! Request handlers, one module per resource

pub mod chat_rooms;
pub mod health;
pub mod messages;
pub mod notifications;
