//! Persistence layer: durable storage for rooms and messages.
//!
//! [`MessageStore`] fronts two backends: PostgreSQL via `sqlx::PgPool`
//! (production) and an in-memory store (development and tests). The
//! relay persists every accepted message *before* any delivery, so
//! recorded history is the source of truth for replay.

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::domain::{Message, Room, RoomId, UserId};
use crate::error::RelayError;

/// Storage backend for rooms and messages.
///
/// Cheap to clone: both backends are handles over shared state.
#[derive(Debug, Clone)]
pub enum MessageStore {
    /// PostgreSQL-backed store.
    Postgres(PostgresStore),
    /// In-memory store for development and tests.
    Memory(MemoryStore),
}

impl MessageStore {
    /// Inserts one message.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on backend failure.
    pub async fn insert_message(&self, message: &Message) -> Result<(), RelayError> {
        match self {
            Self::Postgres(store) => store.insert_message(message).await,
            Self::Memory(store) => store.insert_message(message).await,
        }
    }

    /// Inserts one room.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on backend failure.
    pub async fn insert_room(&self, room: &Room) -> Result<(), RelayError> {
        match self {
            Self::Postgres(store) => store.insert_room(room).await,
            Self::Memory(store) => store.insert_room(room).await,
        }
    }

    /// Returns whether a room exists.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on backend failure.
    pub async fn room_exists(&self, room: RoomId) -> Result<bool, RelayError> {
        match self {
            Self::Postgres(store) => store.room_exists(room).await,
            Self::Memory(store) => store.room_exists(room).await,
        }
    }

    /// Loads a room's messages ordered by `sent_at` ascending, keeping
    /// the most recent `limit` rows when a limit is given.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on backend failure.
    pub async fn room_messages(
        &self,
        room: RoomId,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RelayError> {
        match self {
            Self::Postgres(store) => store.room_messages(room, limit).await,
            Self::Memory(store) => store.room_messages(room, limit).await,
        }
    }

    /// Loads both directions of a direct conversation ordered by
    /// `sent_at` ascending, keeping the most recent `limit` rows when a
    /// limit is given.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on backend failure.
    pub async fn direct_messages(
        &self,
        user_a: &UserId,
        user_b: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RelayError> {
        match self {
            Self::Postgres(store) => store.direct_messages(user_a, user_b, limit).await,
            Self::Memory(store) => store.direct_messages(user_a, user_b, limit).await,
        }
    }

    /// Loads all rooms ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on backend failure.
    pub async fn list_rooms(&self) -> Result<Vec<Room>, RelayError> {
        match self {
            Self::Postgres(store) => store.list_rooms().await,
            Self::Memory(store) => store.list_rooms().await,
        }
    }
}
