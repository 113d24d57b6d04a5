//! Room directory: room creation and history reads.

use crate::domain::{Message, Room, RoomId, UserId};
use crate::error::RelayError;
use crate::persistence::MessageStore;

/// Read/create surface over the room and message tables.
///
/// Rooms are durable and never deleted. Names are labels, not keys, so
/// two rooms may share a name. The existence check lives here on the
/// read path; the send path stays permissive about unknown rooms.
#[derive(Debug, Clone)]
pub struct RoomDirectory {
    store: MessageStore,
}

impl RoomDirectory {
    /// Creates a new `RoomDirectory`.
    #[must_use]
    pub fn new(store: MessageStore) -> Self {
        Self { store }
    }

    /// Creates a room owned by `creator`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::EmptyRoomName`] for an empty name (nothing
    /// is stored) and [`RelayError::Storage`] when persistence fails.
    pub async fn create_room(&self, creator: &UserId, name: String) -> Result<Room, RelayError> {
        if name.is_empty() {
            return Err(RelayError::EmptyRoomName);
        }
        let room = Room::new(name, creator.clone());
        self.store.insert_room(&room).await?;

        tracing::info!(room_id = %room.id, creator = %creator, name = %room.name, "room created");
        Ok(room)
    }

    /// Lists all rooms ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] when the query fails.
    pub async fn list_rooms(&self) -> Result<Vec<Room>, RelayError> {
        self.store.list_rooms().await
    }

    /// Loads a room's messages ordered by `sent_at` ascending.
    ///
    /// With a limit, returns the most recent `limit` messages, still in
    /// ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::RoomNotFound`] for a room that was never
    /// created and [`RelayError::Storage`] when a query fails.
    pub async fn room_history(
        &self,
        room: RoomId,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RelayError> {
        if !self.store.room_exists(room).await? {
            return Err(RelayError::RoomNotFound(*room.as_uuid()));
        }
        self.store.room_messages(room, limit).await
    }

    /// Loads both directions of the conversation between two users,
    /// ordered by `sent_at` ascending.
    ///
    /// Unknown users are not an error: an unstarted conversation is an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] when the query fails.
    pub async fn direct_history(
        &self,
        user_a: &UserId,
        user_b: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RelayError> {
        self.store.direct_messages(user_a, user_b, limit).await
    }
}
