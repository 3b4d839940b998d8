//! Message service
//!
//! Appends messages to rooms and tracks their read state. Every call takes
//! the acting user explicitly and checks room membership before touching
//! the store.

use super::entity::{ChatRoom, Message};
use super::repository::{ChatRoomRepository, MessageRepository};
use crate::application::{AppResult, ApplicationError, MessageValidator};
use crate::domain::listing::UserRepository;
use crate::domain::notification::Notification;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

/// Service for chat messages
#[derive(Debug, Clone)]
pub struct MessageService {
    rooms: ChatRoomRepository,
    messages: MessageRepository,
    users: UserRepository,
    validator: MessageValidator,
}

impl MessageService {
    /// Create a new message service
    pub fn new(pool: SqlitePool, validator: MessageValidator) -> Self {
        Self {
            rooms: ChatRoomRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            validator,
        }
    }

    /// Get the underlying message repository
    #[cfg(test)]
    pub fn repository(&self) -> &MessageRepository {
        &self.messages
    }

    /// Send a message to a room
    ///
    /// The message and the recipient's notification are written together.
    pub async fn send_message(
        &self,
        room_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> AppResult<Message> {
        self.validator.validate_content(content)?;

        let room = self
            .rooms
            .get(room_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("ChatRoom", room_id))?;

        let recipient_id = room
            .counterpart_of(sender_id)
            .ok_or_else(|| ApplicationError::forbidden("ChatRoom", "send message"))?;

        let sender_name = self.users.display_name(sender_id).await?;
        let message = Message::new(room.id, sender_id, content);
        let notification = Notification::new_message(recipient_id, &sender_name, content);

        self.messages
            .create_with_notification(&message, &notification)
            .await?;

        info!(
            message_id = %message.id,
            room_id = %room.id,
            sender_id = %sender_id,
            "Message sent"
        );

        Ok(message)
    }

    /// List every message in a room, marking the viewer's incoming ones read
    pub async fn list_messages(&self, room_id: Uuid, viewer_id: Uuid) -> AppResult<Vec<Message>> {
        let room = self.member_room(room_id, viewer_id).await?;

        let (messages, flipped) = self.messages.mark_read_and_list(room.id, viewer_id).await?;
        if flipped > 0 {
            debug!(room_id = %room.id, viewer_id = %viewer_id, marked = flipped, "Messages marked read");
        }

        Ok(messages)
    }

    /// One page of a room's messages; only the returned page is marked read
    pub async fn list_messages_page(
        &self,
        room_id: Uuid,
        viewer_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Message>> {
        if limit == 0 {
            return Err(ApplicationError::validation(
                "limit",
                "Limit must be greater than zero",
            ));
        }

        let room = self.member_room(room_id, viewer_id).await?;

        let (messages, flipped) = self
            .messages
            .mark_read_and_list_page(room.id, viewer_id, limit, offset)
            .await?;
        if flipped > 0 {
            debug!(room_id = %room.id, viewer_id = %viewer_id, marked = flipped, "Messages marked read");
        }

        Ok(messages)
    }

    /// Explicitly mark a single message read
    ///
    /// Marking your own message, or one that is already read, leaves it
    /// unchanged.
    pub async fn mark_message_read(&self, message_id: Uuid, viewer_id: Uuid) -> AppResult<Message> {
        let mut message = self
            .messages
            .get(message_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Message", message_id))?;

        let room = self
            .rooms
            .get(message.chat_room_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("ChatRoom", message.chat_room_id))?;

        if !room.is_participant(viewer_id) {
            return Err(ApplicationError::forbidden("Message", "mark read"));
        }

        if message.sender_id != viewer_id && !message.is_read {
            self.messages.mark_read(message_id).await?;
            message.is_read = true;
            debug!(message_id = %message_id, viewer_id = %viewer_id, "Message marked read");
        }

        Ok(message)
    }

    /// Number of messages from the other participant the viewer has not read
    pub async fn unread_count(&self, room_id: Uuid, viewer_id: Uuid) -> AppResult<i64> {
        let room = self.member_room(room_id, viewer_id).await?;
        Ok(self.messages.count_unread(room.id, viewer_id).await?)
    }

    /// Fetch a room the user belongs to; outsiders see it as missing
    async fn member_room(&self, room_id: Uuid, user_id: Uuid) -> AppResult<ChatRoom> {
        self.rooms
            .get(room_id)
            .await?
            .filter(|room| room.is_participant(user_id))
            .ok_or_else(|| ApplicationError::not_found("ChatRoom", room_id))
    }
}
