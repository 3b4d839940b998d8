//! Notification entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A per-user notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a new unread notification
    pub fn new(user_id: Uuid, title: impl Into<String>, message: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            message,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Notification telling `recipient_id` that `sender_name` wrote to them
    pub fn new_message(recipient_id: Uuid, sender_name: &str, content: &str) -> Self {
        Self::new(
            recipient_id,
            format!("New message from {}", sender_name),
            Some(content.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_notification() {
        let recipient = Uuid::new_v4();
        let n = Notification::new_message(recipient, "Budi", "Is this available?");

        assert_eq!(n.user_id, recipient);
        assert_eq!(n.title, "New message from Budi");
        assert_eq!(n.message.as_deref(), Some("Is this available?"));
        assert!(!n.is_read);
    }
}
