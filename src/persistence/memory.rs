//! In-memory message store.
//!
//! Backs the relay when `PERSISTENCE_ENABLED=false` (local development)
//! and serves as the storage double in tests. Same contract as the
//! PostgreSQL store; history is lost on restart.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Message, Room, RoomId, UserId};
use crate::error::RelayError;

#[derive(Debug, Default)]
struct MemoryInner {
    messages: Vec<Message>,
    rooms: Vec<Room>,
}

/// Message store held entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one message.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` mirrors the PostgreSQL store.
    pub async fn insert_message(&self, message: &Message) -> Result<(), RelayError> {
        self.inner.write().await.messages.push(message.clone());
        Ok(())
    }

    /// Inserts one room.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` mirrors the PostgreSQL store.
    pub async fn insert_room(&self, room: &Room) -> Result<(), RelayError> {
        self.inner.write().await.rooms.push(room.clone());
        Ok(())
    }

    /// Returns whether a room exists.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` mirrors the PostgreSQL store.
    pub async fn room_exists(&self, room: RoomId) -> Result<bool, RelayError> {
        Ok(self.inner.read().await.rooms.iter().any(|r| r.id == room))
    }

    /// Loads a room's messages ordered by `sent_at` ascending.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` mirrors the PostgreSQL store.
    pub async fn room_messages(
        &self,
        room: RoomId,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RelayError> {
        let inner = self.inner.read().await;
        let matched = inner
            .messages
            .iter()
            .filter(|m| m.room_id() == Some(&room))
            .cloned()
            .collect();
        Ok(most_recent_ascending(matched, limit))
    }

    /// Loads both directions of a direct conversation ordered by
    /// `sent_at` ascending.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` mirrors the PostgreSQL store.
    pub async fn direct_messages(
        &self,
        user_a: &UserId,
        user_b: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RelayError> {
        let inner = self.inner.read().await;
        let matched = inner
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == *user_a && m.receiver_id() == Some(user_b))
                    || (m.sender_id == *user_b && m.receiver_id() == Some(user_a))
            })
            .cloned()
            .collect();
        Ok(most_recent_ascending(matched, limit))
    }

    /// Loads all rooms ordered by creation time.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` mirrors the PostgreSQL store.
    pub async fn list_rooms(&self) -> Result<Vec<Room>, RelayError> {
        let mut rooms = self.inner.read().await.rooms.clone();
        rooms.sort_by_key(|r| r.created_at);
        Ok(rooms)
    }
}

/// Sorts ascending by `sent_at` and keeps the most recent `limit` rows,
/// matching the SQL `DESC LIMIT` subquery re-sorted ascending.
fn most_recent_ascending(mut messages: Vec<Message>, limit: Option<i64>) -> Vec<Message> {
    messages.sort_by_key(|m| m.sent_at);
    if let Some(limit) = limit {
        let keep = usize::try_from(limit).unwrap_or(0);
        if messages.len() > keep {
            messages = messages.split_off(messages.len() - keep);
        }
    }
    messages
}
