//! Notification repository for database operations

use super::entity::Notification;
use crate::domain::listing::repository::parse_uuid;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Repository for notification database operations
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a notification on its own
    pub async fn save(&self, notification: &Notification) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(Error::DatabaseError)?;
        insert_notification(&mut conn, notification).await
    }

    /// Get a notification by ID
    pub async fn get(&self, notification_id: Uuid) -> Result<Option<Notification>> {
        let row: Option<NotificationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, message, is_read, created_at
            FROM notifications
            WHERE id = ?
            "#,
        )
        .bind(notification_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        row.map(NotificationRow::into_notification).transpose()
    }

    /// List a user's notifications, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, message, is_read, created_at
            FROM notifications
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        rows.into_iter().map(NotificationRow::into_notification).collect()
    }

    /// Count a user's unread notifications
    pub async fn count_unread(&self, user_id: Uuid) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0")
                .bind(user_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(Error::DatabaseError)?;

        Ok(count)
    }

    /// Mark a notification read; returns whether a row changed
    pub async fn mark_read(&self, notification_id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND is_read = 0")
            .bind(notification_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Insert a notification on an existing connection or transaction
pub(crate) async fn insert_notification(
    conn: &mut SqliteConnection,
    notification: &Notification,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, title, message, is_read, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(notification.id.to_string())
    .bind(notification.user_id.to_string())
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(notification.is_read)
    .bind(notification.created_at)
    .execute(&mut *conn)
    .await
    .map_err(Error::DatabaseError)?;

    Ok(())
}

// ========== Database Row Types ==========

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: String,
    user_id: String,
    title: String,
    message: Option<String>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> Result<Notification> {
        Ok(Notification {
            id: parse_uuid(&self.id, "notification")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            title: self.title,
            message: self.message,
            is_read: self.is_read,
            created_at: self.created_at,
        })
    }
}
