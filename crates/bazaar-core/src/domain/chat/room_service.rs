//! Chat room service
//!
//! Creates and finds the single room per (product, buyer, seller) and
//! serves room listings from the viewer's side.

use super::entity::{ChatRoom, RoomOrder, RoomSummary};
use super::message_service::MessageService;
use super::repository::ChatRoomRepository;
use crate::application::{AppResult, ApplicationError, MessageValidator};
use crate::domain::listing::ProductRepository;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Service for chat room lifecycle and listings
#[derive(Debug, Clone)]
pub struct ChatRoomService {
    rooms: ChatRoomRepository,
    products: ProductRepository,
    messages: MessageService,
    validator: MessageValidator,
    order: RoomOrder,
}

impl ChatRoomService {
    /// Create a new chat room service
    pub fn new(pool: SqlitePool, order: RoomOrder, validator: MessageValidator) -> Self {
        Self {
            rooms: ChatRoomRepository::new(pool.clone()),
            products: ProductRepository::new(pool.clone()),
            messages: MessageService::new(pool, validator),
            validator,
            order,
        }
    }

    /// Get the underlying room repository
    pub fn repository(&self) -> &ChatRoomRepository {
        &self.rooms
    }

    // ========== Room Lifecycle ==========

    /// Find the buyer's room for a product, creating it on first contact
    ///
    /// Returns the room and whether it was created by this call. When the
    /// room already exists the initial message is ignored.
    pub async fn create_or_get_room(
        &self,
        product_id: i64,
        buyer_id: Uuid,
        initial_message: Option<&str>,
    ) -> AppResult<(ChatRoom, bool)> {
        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Product", product_id))?;

        if product.seller_id == buyer_id {
            return Err(ApplicationError::invalid_operation(
                "Cannot start a chat about your own product",
            ));
        }

        if let Some(existing) = self
            .rooms
            .find_by_participants(product.id, buyer_id, product.seller_id)
            .await?
        {
            debug!(room_id = %existing.id, "Using existing chat room");
            return Ok((existing, false));
        }

        // Only a room about to be created needs a deliverable first message
        let initial_message = initial_message.filter(|m| !m.is_empty());
        if let Some(content) = initial_message {
            self.validator.validate_content(content)?;
        }

        let room = ChatRoom::new(product.id, buyer_id, product.seller_id);
        match self.insert_room(&room).await {
            Ok(()) => {}
            Err(ApplicationError::Conflict { .. }) => {
                let winner = self
                    .rooms
                    .find_by_participants(product.id, buyer_id, product.seller_id)
                    .await?
                    .ok_or_else(|| ApplicationError::not_found("ChatRoom", room.id))?;
                warn!(
                    room_id = %winner.id,
                    product_id = product.id,
                    "Chat room created concurrently, using existing"
                );
                return Ok((winner, false));
            }
            Err(e) => return Err(e),
        }

        info!(
            room_id = %room.id,
            product_id = product.id,
            buyer_id = %buyer_id,
            seller_id = %product.seller_id,
            "Created chat room"
        );

        if let Some(content) = initial_message {
            self.messages.send_message(room.id, buyer_id, content).await?;
        }

        Ok((room, true))
    }

    async fn insert_room(&self, room: &ChatRoom) -> AppResult<()> {
        self.rooms.create(room).await.map_err(|e| {
            if e.is_unique_violation() {
                ApplicationError::conflict("ChatRoom", "room already exists for this product and buyer")
            } else {
                e.into()
            }
        })
    }

    /// Get a room the user takes part in
    pub async fn get_room(&self, room_id: Uuid, user_id: Uuid) -> AppResult<ChatRoom> {
        self.rooms
            .get(room_id)
            .await?
            .filter(|room| room.is_participant(user_id))
            .ok_or_else(|| ApplicationError::not_found("ChatRoom", room_id))
    }

    /// Delete a room the user takes part in, along with its messages
    pub async fn delete_room(&self, room_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let room = self.get_room(room_id, user_id).await?;

        if !self.rooms.delete(room.id).await? {
            return Err(ApplicationError::not_found("ChatRoom", room_id));
        }

        info!(room_id = %room_id, user_id = %user_id, "Deleted chat room");
        Ok(())
    }

    // ========== Listings ==========

    /// Summaries of every room the user is buyer or seller in
    pub async fn list_rooms_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoomSummary>> {
        let rows = self
            .rooms
            .list_summaries_for_user(user_id, self.order)
            .await?;

        let summaries = rows
            .into_iter()
            .map(|row| row.into_summary(user_id))
            .collect::<crate::Result<Vec<_>>>()?;

        debug!(user_id = %user_id, count = summaries.len(), "Listed chat rooms");
        Ok(summaries)
    }

    /// Summary of one room from the user's side
    pub async fn get_room_summary(&self, room_id: Uuid, user_id: Uuid) -> AppResult<RoomSummary> {
        let row = self
            .rooms
            .get_summary(room_id, user_id)
            .await?
            .filter(|row| row.has_participant(user_id))
            .ok_or_else(|| ApplicationError::not_found("ChatRoom", room_id))?;

        Ok(row.into_summary(user_id)?)
    }
}
