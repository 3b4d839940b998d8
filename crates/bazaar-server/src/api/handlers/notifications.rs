//! Notification endpoints

use crate::api::AppState;
use crate::api::dto::{ApiResponse, NotificationResponse, UnreadCountResponse};
use crate::api::error::ApiResult;
use crate::api::extract::CurrentUser;
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

/// `GET /notifications`
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<NotificationResponse>>>> {
    let notifications = state.notifications.list_for_user(user_id).await?;
    let data = notifications
        .into_iter()
        .map(NotificationResponse::from)
        .collect();
    Ok(Json(ApiResponse::ok("Notifications retrieved", data)))
}

/// `GET /notifications/unread-count`
pub async fn unread_count(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<ApiResponse<UnreadCountResponse>>> {
    let unread_count = state.notifications.unread_count(user_id).await?;
    Ok(Json(ApiResponse::ok(
        "Unread count retrieved",
        UnreadCountResponse { unread_count },
    )))
}

/// `POST /notifications/{id}/read`
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<NotificationResponse>>> {
    let notification = state
        .notifications
        .mark_read(notification_id, user_id)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Notification marked as read",
        notification.into(),
    )))
}
