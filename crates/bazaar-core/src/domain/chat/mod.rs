//! Chat domain module
//!
//! Chat rooms tie a buyer and a seller to one product listing. Messages are
//! appended to rooms and carry a read flag that flips when the other
//! participant views the room.

pub mod entity;
pub mod message_service;
pub mod repository;
pub mod room_service;

pub use entity::{ChatRoom, Message, RoomOrder, RoomSummary};
pub use message_service::MessageService;
pub use repository::{ChatRoomRepository, MessageRepository, RoomSummaryRow};
pub use room_service::ChatRoomService;
