//! Message endpoints

use crate::api::AppState;
use crate::api::dto::{ApiResponse, MessageResponse, SendMessageRequest};
use crate::api::error::ApiResult;
use crate::api::extract::CurrentUser;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// `POST /messages`
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    let message = state
        .messages
        .send_message(req.room_id, user_id, &req.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Message sent", message.into())),
    ))
}

/// `PATCH /messages/{id}/read`
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(message_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let message = state.messages.mark_message_read(message_id, user_id).await?;
    Ok(Json(ApiResponse::ok("Message marked as read", message.into())))
}
