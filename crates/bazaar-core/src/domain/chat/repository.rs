//! Chat repository implementations
//!
//! Database operations for chat rooms and messages. Room listings are built
//! by explicit projection queries rather than by walking relations.

use super::entity::{ChatRoom, Message, RoomOrder};
use crate::domain::listing::UNKNOWN_USER_NAME;
use crate::domain::listing::repository::parse_uuid;
use crate::domain::notification::Notification;
use crate::domain::notification::repository::insert_notification;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

const ROOM_COLUMNS: &str = "id, product_id, buyer_id, seller_id, created_at";
const MESSAGE_COLUMNS: &str = "id, chat_room_id, sender_id, content, is_read, created_at";

/// Summary projection: room, names, latest message and viewer's unread count.
/// Binds: viewer (unread count), then whatever the WHERE clause needs.
const SUMMARY_SELECT: &str = r#"
    SELECT r.id, r.product_id, r.buyer_id, r.seller_id, r.created_at,
           p.title AS product_title,
           b.name AS buyer_name,
           s.name AS seller_name,
           lm.content AS last_message,
           lm.created_at AS last_message_at,
           (SELECT COUNT(*) FROM messages u
             WHERE u.chat_room_id = r.id AND u.sender_id <> ? AND u.is_read = 0) AS unread_count
    FROM chat_rooms r
    LEFT JOIN products p ON p.id = r.product_id
    LEFT JOIN users b ON b.id = r.buyer_id
    LEFT JOIN users s ON s.id = r.seller_id
    LEFT JOIN messages lm ON lm.seq = (
        SELECT m.seq FROM messages m
        WHERE m.chat_room_id = r.id
        ORDER BY m.created_at DESC, m.seq DESC
        LIMIT 1
    )
"#;

/// Chat room repository for database operations
#[derive(Debug, Clone)]
pub struct ChatRoomRepository {
    pool: SqlitePool,
}

impl ChatRoomRepository {
    /// Create a new chat room repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new room
    ///
    /// A second room for the same (product, buyer, seller) fails with a
    /// unique violation; see [`Error::is_unique_violation`].
    pub async fn create(&self, room: &ChatRoom) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_rooms (id, product_id, buyer_id, seller_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(room.id.to_string())
        .bind(room.product_id)
        .bind(room.buyer_id.to_string())
        .bind(room.seller_id.to_string())
        .bind(room.created_at)
        .execute(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        Ok(())
    }

    /// Get a room by ID
    pub async fn get(&self, room_id: Uuid) -> Result<Option<ChatRoom>> {
        let row: Option<ChatRoomRow> =
            sqlx::query_as(&format!("SELECT {} FROM chat_rooms WHERE id = ?", ROOM_COLUMNS))
                .bind(room_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::DatabaseError)?;

        row.map(ChatRoomRow::into_room).transpose()
    }

    /// Find the room for a (product, buyer, seller) triple
    pub async fn find_by_participants(
        &self,
        product_id: i64,
        buyer_id: Uuid,
        seller_id: Uuid,
    ) -> Result<Option<ChatRoom>> {
        let row: Option<ChatRoomRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chat_rooms WHERE product_id = ? AND buyer_id = ? AND seller_id = ?",
            ROOM_COLUMNS
        ))
        .bind(product_id)
        .bind(buyer_id.to_string())
        .bind(seller_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        row.map(ChatRoomRow::into_room).transpose()
    }

    /// List summaries of every room the user takes part in
    pub async fn list_summaries_for_user(
        &self,
        user_id: Uuid,
        order: RoomOrder,
    ) -> Result<Vec<RoomSummaryRow>> {
        let order_by = match order {
            RoomOrder::Created => "r.created_at DESC, r.rowid DESC",
            RoomOrder::Activity => {
                "COALESCE(lm.created_at, r.created_at) DESC, r.created_at DESC, r.rowid DESC"
            }
        };
        let sql = format!(
            "{} WHERE r.buyer_id = ? OR r.seller_id = ? ORDER BY {}",
            SUMMARY_SELECT, order_by
        );
        let user = user_id.to_string();

        let rows: Vec<RoomSummaryRow> = sqlx::query_as(&sql)
            .bind(&user)
            .bind(&user)
            .bind(&user)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(rows)
    }

    /// Summary of a single room from the viewer's side
    pub async fn get_summary(&self, room_id: Uuid, viewer_id: Uuid) -> Result<Option<RoomSummaryRow>> {
        let sql = format!("{} WHERE r.id = ?", SUMMARY_SELECT);

        let row: Option<RoomSummaryRow> = sqlx::query_as(&sql)
            .bind(viewer_id.to_string())
            .bind(room_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(row)
    }

    /// Delete a room and, through the foreign key, all its messages
    pub async fn delete(&self, room_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM chat_rooms WHERE id = ?")
            .bind(room_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Message repository for database operations
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a message and its recipient notification in one transaction
    pub async fn create_with_notification(
        &self,
        message: &Message,
        notification: &Notification,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::DatabaseError)?;

        insert_message(&mut tx, message).await?;
        insert_notification(&mut tx, notification).await?;

        tx.commit().await.map_err(Error::DatabaseError)?;
        Ok(())
    }

    /// Append a message on its own
    #[cfg(test)]
    pub async fn create(&self, message: &Message) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(Error::DatabaseError)?;
        insert_message(&mut conn, message).await
    }

    /// Get a message by ID
    pub async fn get(&self, message_id: Uuid) -> Result<Option<Message>> {
        let row: Option<MessageRow> =
            sqlx::query_as(&format!("SELECT {} FROM messages WHERE id = ?", MESSAGE_COLUMNS))
                .bind(message_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::DatabaseError)?;

        row.map(MessageRow::into_message).transpose()
    }

    /// List all messages in a room (ordered by creation time, then insertion)
    #[cfg(test)]
    pub async fn list_by_room(&self, room_id: Uuid) -> Result<Vec<Message>> {
        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "SELECT {} FROM messages WHERE chat_room_id = ? ORDER BY created_at ASC, seq ASC",
            MESSAGE_COLUMNS
        ))
        .bind(room_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        rows.into_iter().map(MessageRow::into_message).collect()
    }

    /// Mark the viewer's unread incoming messages read, then fetch the room
    ///
    /// Both statements run in one transaction, so the returned rows carry
    /// the flipped flags. Returns the messages and how many were flipped.
    pub async fn mark_read_and_list(
        &self,
        room_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<(Vec<Message>, u64)> {
        let room = room_id.to_string();
        let viewer = viewer_id.to_string();
        let mut tx = self.pool.begin().await.map_err(Error::DatabaseError)?;

        let flipped = sqlx::query(
            r#"
            UPDATE messages SET is_read = 1
            WHERE chat_room_id = ? AND sender_id <> ? AND is_read = 0
            "#,
        )
        .bind(&room)
        .bind(&viewer)
        .execute(&mut *tx)
        .await
        .map_err(Error::DatabaseError)?
        .rows_affected();

        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "SELECT {} FROM messages WHERE chat_room_id = ? ORDER BY created_at ASC, seq ASC",
            MESSAGE_COLUMNS
        ))
        .bind(&room)
        .fetch_all(&mut *tx)
        .await
        .map_err(Error::DatabaseError)?;

        tx.commit().await.map_err(Error::DatabaseError)?;

        let messages = rows
            .into_iter()
            .map(MessageRow::into_message)
            .collect::<Result<Vec<_>>>()?;
        Ok((messages, flipped))
    }

    /// Paginated variant of [`Self::mark_read_and_list`]; only the returned
    /// page is marked read
    pub async fn mark_read_and_list_page(
        &self,
        room_id: Uuid,
        viewer_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Message>, u64)> {
        let room = room_id.to_string();
        let viewer = viewer_id.to_string();
        let mut tx = self.pool.begin().await.map_err(Error::DatabaseError)?;

        let flipped = sqlx::query(
            r#"
            UPDATE messages SET is_read = 1
            WHERE sender_id <> ? AND is_read = 0 AND seq IN (
                SELECT seq FROM messages
                WHERE chat_room_id = ?
                ORDER BY created_at ASC, seq ASC
                LIMIT ? OFFSET ?
            )
            "#,
        )
        .bind(&viewer)
        .bind(&room)
        .bind(limit as i64)
        .bind(offset as i64)
        .execute(&mut *tx)
        .await
        .map_err(Error::DatabaseError)?
        .rows_affected();

        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "SELECT {} FROM messages WHERE chat_room_id = ? ORDER BY created_at ASC, seq ASC LIMIT ? OFFSET ?",
            MESSAGE_COLUMNS
        ))
        .bind(&room)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&mut *tx)
        .await
        .map_err(Error::DatabaseError)?;

        tx.commit().await.map_err(Error::DatabaseError)?;

        let messages = rows
            .into_iter()
            .map(MessageRow::into_message)
            .collect::<Result<Vec<_>>>()?;
        Ok((messages, flipped))
    }

    /// Mark a single message read; returns whether a row changed
    pub async fn mark_read(&self, message_id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE messages SET is_read = 1 WHERE id = ? AND is_read = 0")
            .bind(message_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(result.rows_affected() > 0)
    }

    /// Count messages in a room not sent by the viewer and not yet read
    pub async fn count_unread(&self, room_id: Uuid, viewer_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages WHERE chat_room_id = ? AND sender_id <> ? AND is_read = 0",
        )
        .bind(room_id.to_string())
        .bind(viewer_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        Ok(count)
    }

    /// Count messages in a room
    #[cfg(test)]
    pub async fn count_by_room(&self, room_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages WHERE chat_room_id = ?")
            .bind(room_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(count)
    }
}

async fn insert_message(conn: &mut SqliteConnection, message: &Message) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO messages (id, chat_room_id, sender_id, content, is_read, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(message.id.to_string())
    .bind(message.chat_room_id.to_string())
    .bind(message.sender_id.to_string())
    .bind(&message.content)
    .bind(message.is_read)
    .bind(message.created_at)
    .execute(&mut *conn)
    .await
    .map_err(Error::DatabaseError)?;

    Ok(())
}

// ========== Database Row Types ==========

#[derive(sqlx::FromRow)]
struct ChatRoomRow {
    id: String,
    product_id: i64,
    buyer_id: String,
    seller_id: String,
    created_at: DateTime<Utc>,
}

impl ChatRoomRow {
    fn into_room(self) -> Result<ChatRoom> {
        Ok(ChatRoom {
            id: parse_uuid(&self.id, "chat room")?,
            product_id: self.product_id,
            buyer_id: parse_uuid(&self.buyer_id, "buyer")?,
            seller_id: parse_uuid(&self.seller_id, "seller")?,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: String,
    chat_room_id: String,
    sender_id: String,
    content: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> Result<Message> {
        Ok(Message {
            id: parse_uuid(&self.id, "message")?,
            chat_room_id: parse_uuid(&self.chat_room_id, "chat room")?,
            sender_id: parse_uuid(&self.sender_id, "sender")?,
            content: self.content,
            is_read: self.is_read,
            created_at: self.created_at,
        })
    }
}

/// Flat row returned by the room summary projection
#[derive(Debug, sqlx::FromRow)]
pub struct RoomSummaryRow {
    id: String,
    product_id: i64,
    buyer_id: String,
    seller_id: String,
    created_at: DateTime<Utc>,
    product_title: Option<String>,
    buyer_name: Option<String>,
    seller_name: Option<String>,
    last_message: Option<String>,
    last_message_at: Option<DateTime<Utc>>,
    unread_count: i64,
}

impl RoomSummaryRow {
    /// Resolve the row into a summary from `viewer_id`'s side
    pub fn into_summary(self, viewer_id: Uuid) -> Result<super::entity::RoomSummary> {
        let room = ChatRoomRow {
            id: self.id,
            product_id: self.product_id,
            buyer_id: self.buyer_id,
            seller_id: self.seller_id,
            created_at: self.created_at,
        }
        .into_room()?;

        let buyer_name = self
            .buyer_name
            .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string());
        let seller_name = self
            .seller_name
            .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string());
        let counterpart_name = if viewer_id == room.buyer_id {
            seller_name.clone()
        } else {
            buyer_name.clone()
        };

        Ok(super::entity::RoomSummary {
            id: room.id,
            product_id: room.product_id,
            product_title: self.product_title.unwrap_or_default(),
            buyer_id: room.buyer_id,
            buyer_name,
            seller_id: room.seller_id,
            seller_name,
            counterpart_name,
            created_at: room.created_at,
            last_message: self.last_message,
            last_message_at: self.last_message_at.unwrap_or(room.created_at),
            unread_count: self.unread_count,
        })
    }

    /// Whether the user is the buyer or seller of this room
    pub fn has_participant(&self, user_id: Uuid) -> bool {
        let user = user_id.to_string();
        self.buyer_id == user || self.seller_id == user
    }
}
