//! HTTP API tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot` against an
//! in-memory database.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use bazaar_core::config::ChatConfig;
use bazaar_core::domain::listing::{ProductRepository, UserRepository};
use bazaar_core::storage::Database;
use bazaar_server::api::{self, AppState, USER_ID_HEADER};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    app: Router,
    buyer: Uuid,
    seller: Uuid,
    product_id: i64,
}

async fn test_app() -> TestApp {
    let db = Database::in_memory().await.unwrap();
    let users = UserRepository::new(db.pool().clone());
    let buyer = users.create("Budi").await.unwrap().id;
    let seller = users.create("Sari").await.unwrap().id;
    let product_id = ProductRepository::new(db.pool().clone())
        .create("Road bike", seller)
        .await
        .unwrap()
        .id;

    let app = api::router(AppState::new(db, &ChatConfig::default()));
    TestApp {
        app,
        buyer,
        seller,
        product_id,
    }
}

impl TestApp {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn open_room(&self, initial_message: Option<&str>) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/chatrooms",
            Some(self.buyer),
            Some(json!({ "productId": self.product_id, "initialMessage": initial_message })),
        )
        .await
    }
}

#[tokio::test]
async fn test_health() {
    let t = test_app().await;
    let (status, body) = t.request(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["schemaVersion"], 2);
}

#[tokio::test]
async fn test_missing_or_bad_identity_is_unauthorized() {
    let t = test_app().await;

    let (status, body) = t.request(Method::GET, "/chatrooms", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "unauthorized");

    let request = Request::builder()
        .uri("/chatrooms")
        .header(USER_ID_HEADER, "not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_room_then_existing() {
    let t = test_app().await;

    let (status, body) = t.open_room(Some("Is this available?")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let room_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["productTitle"], "Road bike");
    assert_eq!(body["data"]["sellerName"], "Sari");
    assert_eq!(body["data"]["lastMessage"], "Is this available?");

    let (status, body) = t.open_room(Some("ignored")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], room_id.as_str());
    assert_eq!(body["data"]["lastMessage"], "Is this available?");
}

#[tokio::test]
async fn test_existing_room_returned_despite_bad_initial_message() {
    let t = test_app().await;
    let (status, body) = t.open_room(Some("hi")).await;
    assert_eq!(status, StatusCode::CREATED);
    let room_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = t.open_room(Some(&"x".repeat(2001))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], room_id.as_str());
    assert_eq!(body["data"]["lastMessage"], "hi");

    let (status, body) = t
        .request(
            Method::POST,
            "/chatrooms",
            Some(t.seller),
            Some(json!({ "productId": t.product_id, "initialMessage": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_operation");
}

#[tokio::test]
async fn test_create_room_errors() {
    let t = test_app().await;

    // Seller contacting themselves
    let (status, body) = t
        .request(
            Method::POST,
            "/chatrooms",
            Some(t.seller),
            Some(json!({ "productId": t.product_id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_operation");

    let (status, _) = t
        .request(
            Method::POST,
            "/chatrooms",
            Some(t.buyer),
            Some(json!({ "productId": 424242 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = t.open_room(Some(&"x".repeat(2001))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_conversation_flow() {
    let t = test_app().await;
    let (_, body) = t.open_room(Some("Is this available?")).await;
    let room_id = body["data"]["id"].as_str().unwrap().to_string();

    // Seller sees one unread, opens the room, replies
    let (_, body) = t
        .request(Method::GET, "/chatrooms", Some(t.seller), None)
        .await;
    assert_eq!(body["data"][0]["unreadCount"], 1);
    assert_eq!(body["data"][0]["counterpartName"], "Budi");

    let (status, body) = t
        .request(
            Method::GET,
            &format!("/chatrooms/{}/messages", room_id),
            Some(t.seller),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["isRead"], true);

    let (status, body) = t
        .request(
            Method::POST,
            "/messages",
            Some(t.seller),
            Some(json!({ "roomId": room_id, "content": "Yes" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["isRead"], false);

    let (_, body) = t
        .request(Method::GET, "/chatrooms", Some(t.buyer), None)
        .await;
    assert_eq!(body["data"][0]["lastMessage"], "Yes");
    assert_eq!(body["data"][0]["unreadCount"], 1);

    let (_, body) = t
        .request(
            Method::GET,
            &format!("/chatrooms/{}/unread-count", room_id),
            Some(t.seller),
            None,
        )
        .await;
    assert_eq!(body["data"]["unreadCount"], 0);

    // The buyer was notified of the reply
    let (_, body) = t
        .request(Method::GET, "/notifications", Some(t.buyer), None)
        .await;
    assert_eq!(body["data"][0]["title"], "New message from Sari");
    let notification_id = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = t
        .request(
            Method::POST,
            &format!("/notifications/{}/read", notification_id),
            Some(t.buyer),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = t
        .request(Method::GET, "/notifications/unread-count", Some(t.buyer), None)
        .await;
    assert_eq!(body["data"]["unreadCount"], 0);
}

#[tokio::test]
async fn test_outsider_access() {
    let t = test_app().await;
    let (_, body) = t.open_room(Some("hi")).await;
    let room_id = body["data"]["id"].as_str().unwrap().to_string();
    let outsider = Uuid::new_v4();

    let (status, _) = t
        .request(
            Method::GET,
            &format!("/chatrooms/{}", room_id),
            Some(outsider),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t
        .request(
            Method::GET,
            &format!("/chatrooms/{}/messages", room_id),
            Some(outsider),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = t
        .request(
            Method::POST,
            "/messages",
            Some(outsider),
            Some(json!({ "roomId": room_id, "content": "let me in" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    // Nothing the outsider did touched the seller's unread count
    let (_, body) = t
        .request(
            Method::GET,
            &format!("/chatrooms/{}/unread-count", room_id),
            Some(t.seller),
            None,
        )
        .await;
    assert_eq!(body["data"]["unreadCount"], 1);
}

#[tokio::test]
async fn test_mark_message_read_and_paging() {
    let t = test_app().await;
    let (_, body) = t.open_room(Some("first")).await;
    let room_id = body["data"]["id"].as_str().unwrap().to_string();

    for content in ["second", "third"] {
        t.request(
            Method::POST,
            "/messages",
            Some(t.buyer),
            Some(json!({ "chatId": room_id, "content": content })),
        )
        .await;
    }

    let (_, body) = t
        .request(
            Method::GET,
            &format!("/chatrooms/{}/messages?limit=1&offset=1", room_id),
            Some(t.seller),
            None,
        )
        .await;
    let page = body["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["content"], "second");

    let (_, body) = t
        .request(Method::GET, "/chatrooms", Some(t.seller), None)
        .await;
    assert_eq!(body["data"][0]["unreadCount"], 2);

    // Explicitly mark the first message
    let (_, body) = t
        .request(
            Method::GET,
            &format!("/chatrooms/{}/messages", room_id),
            Some(t.buyer),
            None,
        )
        .await;
    let first_id = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = t
        .request(
            Method::PATCH,
            &format!("/messages/{}/read", first_id),
            Some(t.seller),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isRead"], true);

    let (_, body) = t
        .request(Method::GET, "/chatrooms", Some(t.seller), None)
        .await;
    assert_eq!(body["data"][0]["unreadCount"], 1);
}

#[tokio::test]
async fn test_delete_room() {
    let t = test_app().await;
    let (_, body) = t.open_room(Some("hi")).await;
    let room_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = t
        .request(
            Method::DELETE,
            &format!("/chatrooms/{}", room_id),
            Some(Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = t
        .request(
            Method::DELETE,
            &format!("/chatrooms/{}", room_id),
            Some(t.buyer),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, body) = t
        .request(Method::GET, "/chatrooms", Some(t.buyer), None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
