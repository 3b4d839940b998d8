//! HTTP API
//!
//! Routes, shared state and the JSON surface over the chat services.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;

use axum::{
    Router,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    routing::{get, patch, post},
};
use bazaar_core::application::MessageValidator;
use bazaar_core::config::ChatConfig;
use bazaar_core::domain::chat::{ChatRoomService, MessageService};
use bazaar_core::domain::notification::NotificationService;
use bazaar_core::storage::Database;
use handlers::{chat_rooms, health, messages, notifications};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use extract::{CurrentUser, USER_ID_HEADER};

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub rooms: ChatRoomService,
    pub messages: MessageService,
    pub notifications: NotificationService,
}

impl AppState {
    /// Build the services over an open database
    pub fn new(db: Database, chat: &ChatConfig) -> Self {
        let validator = MessageValidator::new(chat.max_message_length);
        let pool = db.pool().clone();

        Self {
            rooms: ChatRoomService::new(pool.clone(), chat.room_order, validator),
            messages: MessageService::new(pool.clone(), validator),
            notifications: NotificationService::new(pool),
            db,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]);

    Router::new()
        .route("/health", get(health::health))
        .route(
            "/chatrooms",
            post(chat_rooms::create_room).get(chat_rooms::list_rooms),
        )
        .route(
            "/chatrooms/{id}",
            get(chat_rooms::get_room).delete(chat_rooms::delete_room),
        )
        .route("/chatrooms/{id}/messages", get(chat_rooms::list_messages))
        .route(
            "/chatrooms/{id}/unread-count",
            get(chat_rooms::unread_count),
        )
        .route("/messages", post(messages::send_message))
        .route("/messages/{id}/read", patch(messages::mark_read))
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
