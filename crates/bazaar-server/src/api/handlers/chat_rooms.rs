//! Chat room endpoints

use crate::api::AppState;
use crate::api::dto::{
    ApiResponse, ChatRoomResponse, CreateChatRoomRequest, MessageResponse, PageQuery,
    UnreadCountResponse,
};
use crate::api::error::ApiResult;
use crate::api::extract::CurrentUser;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

/// `POST /chatrooms`: contact the seller of a product
///
/// 201 when the room is new, 200 when the buyer already had one.
pub async fn create_room(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<CreateChatRoomRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ChatRoomResponse>>)> {
    let (room, created) = state
        .rooms
        .create_or_get_room(req.product_id, user_id, req.initial_message.as_deref())
        .await?;
    let summary = state.rooms.get_room_summary(room.id, user_id).await?;

    let (status, message) = if created {
        (StatusCode::CREATED, "Chat room created")
    } else {
        (StatusCode::OK, "Chat room already exists")
    };
    Ok((status, Json(ApiResponse::ok(message, summary.into()))))
}

/// `GET /chatrooms`
pub async fn list_rooms(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<ChatRoomResponse>>>> {
    let rooms = state.rooms.list_rooms_for_user(user_id).await?;
    let data = rooms.into_iter().map(ChatRoomResponse::from).collect();
    Ok(Json(ApiResponse::ok("Chat rooms retrieved", data)))
}

/// `GET /chatrooms/{id}`
pub async fn get_room(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(room_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ChatRoomResponse>>> {
    let summary = state.rooms.get_room_summary(room_id, user_id).await?;
    Ok(Json(ApiResponse::ok("Chat room retrieved", summary.into())))
}

/// `GET /chatrooms/{id}/messages`: viewing marks the other side's messages read
pub async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(room_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<ApiResponse<Vec<MessageResponse>>>> {
    let messages = match page.limit {
        Some(limit) => {
            state
                .messages
                .list_messages_page(room_id, user_id, limit, page.offset.unwrap_or(0))
                .await?
        }
        None => state.messages.list_messages(room_id, user_id).await?,
    };

    let data = messages.into_iter().map(MessageResponse::from).collect();
    Ok(Json(ApiResponse::ok("Messages retrieved", data)))
}

/// `GET /chatrooms/{id}/unread-count`
pub async fn unread_count(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(room_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<UnreadCountResponse>>> {
    let unread_count = state.messages.unread_count(room_id, user_id).await?;
    Ok(Json(ApiResponse::ok(
        "Unread count retrieved",
        UnreadCountResponse { unread_count },
    )))
}

/// `DELETE /chatrooms/{id}`
pub async fn delete_room(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(room_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.rooms.delete_room(room_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
