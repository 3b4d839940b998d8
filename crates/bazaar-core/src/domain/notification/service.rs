//! Notification service
//!
//! Read-side operations over a user's notifications. Notifications are
//! written by the message service when a chat message is sent.

use super::entity::Notification;
use super::repository::NotificationRepository;
use crate::application::{AppResult, ApplicationError};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// Service for a user's notifications
#[derive(Debug, Clone)]
pub struct NotificationService {
    repository: NotificationRepository,
}

impl NotificationService {
    /// Create a new notification service
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: NotificationRepository::new(pool),
        }
    }

    /// List the user's notifications, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        Ok(self.repository.list_for_user(user_id).await?)
    }

    /// Count the user's unread notifications
    pub async fn unread_count(&self, user_id: Uuid) -> AppResult<i64> {
        Ok(self.repository.count_unread(user_id).await?)
    }

    /// Mark one of the user's notifications read
    ///
    /// Notifications belonging to someone else are reported as not found.
    pub async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> AppResult<Notification> {
        let mut notification = self
            .repository
            .get(notification_id)
            .await?
            .filter(|n| n.user_id == user_id)
            .ok_or_else(|| ApplicationError::not_found("Notification", notification_id))?;

        if !notification.is_read {
            self.repository.mark_read(notification_id).await?;
            notification.is_read = true;
            debug!(notification_id = %notification_id, "Notification marked read");
        }

        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::UserRepository;
    use crate::storage::Database;

    #[tokio::test]
    async fn test_mark_read_hides_other_users_notifications() {
        let db = Database::in_memory().await.unwrap();
        let users = UserRepository::new(db.pool().clone());
        let owner = users.create("Owner").await.unwrap();
        let other = users.create("Other").await.unwrap();

        let n = Notification::new_message(owner.id, "Other", "hello");
        NotificationRepository::new(db.pool().clone())
            .save(&n)
            .await
            .unwrap();

        let service = NotificationService::new(db.pool().clone());

        let err = service.mark_read(n.id, other.id).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
        assert_eq!(service.unread_count(owner.id).await.unwrap(), 1);

        let marked = service.mark_read(n.id, owner.id).await.unwrap();
        assert!(marked.is_read);
        assert_eq!(service.unread_count(owner.id).await.unwrap(), 0);

        // Second call is a no-op
        let again = service.mark_read(n.id, owner.id).await.unwrap();
        assert!(again.is_read);
    }

    #[tokio::test]
    async fn test_mark_read_missing() {
        let db = Database::in_memory().await.unwrap();
        let service = NotificationService::new(db.pool().clone());

        let err = service
            .mark_read(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
