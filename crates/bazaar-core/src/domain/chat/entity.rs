//! Chat room and message entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A conversation about one product between its seller and one buyer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: Uuid,
    pub product_id: i64,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ChatRoom {
    /// Create a new room with a fresh identifier
    pub fn new(product_id: i64, buyer_id: Uuid, seller_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            buyer_id,
            seller_id,
            created_at: Utc::now(),
        }
    }

    /// Whether the user is the room's buyer or seller
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.buyer_id == user_id || self.seller_id == user_id
    }

    /// The other participant, if `user_id` is one of them
    pub fn counterpart_of(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.buyer_id {
            Some(self.seller_id)
        } else if user_id == self.seller_id {
            Some(self.buyer_id)
        } else {
            None
        }
    }
}

/// A message in a chat room
///
/// Immutable once written except for `is_read`, which only ever goes from
/// false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_room_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new unread message
    pub fn new(chat_room_id: Uuid, sender_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_room_id,
            sender_id,
            content: content.into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

/// A room as seen by one of its participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: Uuid,
    pub product_id: i64,
    pub product_title: String,
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub seller_id: Uuid,
    pub seller_name: String,
    /// Display name of the participant who is not the viewer
    pub counterpart_name: String,
    pub created_at: DateTime<Utc>,
    pub last_message: Option<String>,
    /// Time of the latest message, or the room's creation time if it has none
    pub last_message_at: DateTime<Utc>,
    /// Messages from the counterpart the viewer has not read yet
    pub unread_count: i64,
}

/// How room lists are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomOrder {
    /// Newest room first
    #[default]
    Created,
    /// Most recent message (or room creation) first
    Activity,
}

impl RoomOrder {
    /// Convert to string for configuration storage
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomOrder::Created => "created",
            RoomOrder::Activity => "activity",
        }
    }

    /// Parse from configuration string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(RoomOrder::Created),
            "activity" => Some(RoomOrder::Activity),
            _ => None,
        }
    }
}

impl fmt::Display for RoomOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participants_and_counterparts() {
        let buyer = Uuid::new_v4();
        let seller = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let room = ChatRoom::new(7, buyer, seller);

        assert!(room.is_participant(buyer));
        assert!(room.is_participant(seller));
        assert!(!room.is_participant(stranger));

        assert_eq!(room.counterpart_of(buyer), Some(seller));
        assert_eq!(room.counterpart_of(seller), Some(buyer));
        assert_eq!(room.counterpart_of(stranger), None);
    }

    #[test]
    fn test_new_message_is_unread() {
        let message = Message::new(Uuid::new_v4(), Uuid::new_v4(), "hello");
        assert!(!message.is_read);
        assert_eq!(message.content, "hello");
    }

    #[test]
    fn test_room_order_parse() {
        assert_eq!(RoomOrder::parse("created"), Some(RoomOrder::Created));
        assert_eq!(RoomOrder::parse("activity"), Some(RoomOrder::Activity));
        assert_eq!(RoomOrder::parse("recent"), None);
        assert_eq!(RoomOrder::default().to_string(), "created");
    }

    #[test]
    fn test_room_order_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RoomOrder::Activity).unwrap(),
            "\"activity\""
        );
        let parsed: RoomOrder = serde_json::from_str("\"created\"").unwrap();
        assert_eq!(parsed, RoomOrder::Created);
    }
}
