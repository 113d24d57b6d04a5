//! PostgreSQL implementation of the message store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{MessageRow, RoomRow};
use crate::domain::{Message, Room, RoomId, UserId};
use crate::error::RelayError;

type MessageTuple = (Uuid, String, Option<String>, Option<Uuid>, String, DateTime<Utc>);

/// PostgreSQL-backed message store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts one message row.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on database failure.
    pub async fn insert_message(&self, message: &Message) -> Result<(), RelayError> {
        let row = MessageRow::from(message);
        sqlx::query(
            "INSERT INTO messages (id, sender_id, receiver_id, room_id, body, sent_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(row.id)
        .bind(&row.sender_id)
        .bind(&row.receiver_id)
        .bind(row.room_id)
        .bind(&row.body)
        .bind(row.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RelayError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Inserts one room row.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on database failure.
    pub async fn insert_room(&self, room: &Room) -> Result<(), RelayError> {
        sqlx::query("INSERT INTO rooms (id, name, creator_id, created_at) VALUES ($1, $2, $3, $4)")
            .bind(room.id.as_uuid())
            .bind(&room.name)
            .bind(room.creator_id.as_str())
            .bind(room.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Returns whether a room row exists.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on database failure.
    pub async fn room_exists(&self, room: RoomId) -> Result<bool, RelayError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM rooms WHERE id = $1)")
            .bind(room.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        Ok(exists)
    }

    /// Loads a room's messages ordered by `sent_at` ascending.
    ///
    /// With a limit, returns the most recent `limit` messages, still in
    /// ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on database failure, or
    /// [`RelayError::Internal`] if a row violates the one-address
    /// invariant.
    pub async fn room_messages(
        &self,
        room: RoomId,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RelayError> {
        let rows = if let Some(limit) = limit {
            sqlx::query_as::<_, MessageTuple>(
                "SELECT id, sender_id, receiver_id, room_id, body, sent_at FROM ( \
                     SELECT id, sender_id, receiver_id, room_id, body, sent_at \
                     FROM messages WHERE room_id = $1 ORDER BY sent_at DESC LIMIT $2 \
                 ) recent ORDER BY sent_at ASC",
            )
            .bind(room.as_uuid())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, MessageTuple>(
                "SELECT id, sender_id, receiver_id, room_id, body, sent_at \
                 FROM messages WHERE room_id = $1 ORDER BY sent_at ASC",
            )
            .bind(room.as_uuid())
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| RelayError::Storage(e.to_string()))?;

        collect_messages(rows)
    }

    /// Loads both directions of a direct conversation ordered by
    /// `sent_at` ascending.
    ///
    /// With a limit, returns the most recent `limit` messages, still in
    /// ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on database failure, or
    /// [`RelayError::Internal`] if a row violates the one-address
    /// invariant.
    pub async fn direct_messages(
        &self,
        user_a: &UserId,
        user_b: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RelayError> {
        let rows = if let Some(limit) = limit {
            sqlx::query_as::<_, MessageTuple>(
                "SELECT id, sender_id, receiver_id, room_id, body, sent_at FROM ( \
                     SELECT id, sender_id, receiver_id, room_id, body, sent_at \
                     FROM messages \
                     WHERE (sender_id = $1 AND receiver_id = $2) \
                        OR (sender_id = $2 AND receiver_id = $1) \
                     ORDER BY sent_at DESC LIMIT $3 \
                 ) recent ORDER BY sent_at ASC",
            )
            .bind(user_a.as_str())
            .bind(user_b.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, MessageTuple>(
                "SELECT id, sender_id, receiver_id, room_id, body, sent_at \
                 FROM messages \
                 WHERE (sender_id = $1 AND receiver_id = $2) \
                    OR (sender_id = $2 AND receiver_id = $1) \
                 ORDER BY sent_at ASC",
            )
            .bind(user_a.as_str())
            .bind(user_b.as_str())
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| RelayError::Storage(e.to_string()))?;

        collect_messages(rows)
    }

    /// Loads all rooms ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] on database failure.
    pub async fn list_rooms(&self) -> Result<Vec<Room>, RelayError> {
        let rows = sqlx::query_as::<_, (Uuid, String, String, DateTime<Utc>)>(
            "SELECT id, name, creator_id, created_at FROM rooms ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RelayError::Storage(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, name, creator_id, created_at)| {
                Room::from(RoomRow {
                    id,
                    name,
                    creator_id,
                    created_at,
                })
            })
            .collect())
    }
}

fn collect_messages(rows: Vec<MessageTuple>) -> Result<Vec<Message>, RelayError> {
    rows.into_iter()
        .map(|(id, sender_id, receiver_id, room_id, body, sent_at)| {
            Message::try_from(MessageRow {
                id,
                sender_id,
                receiver_id,
                room_id,
                body,
                sent_at,
            })
        })
        .collect()
}
