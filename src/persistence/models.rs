//! Database row models for rooms and messages.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Address, Message, MessageId, Room, RoomId, UserId};
use crate::error::RelayError;

/// A row from the `messages` table.
///
/// The one-address invariant is a `CHECK` constraint at this level:
/// exactly one of `receiver_id` / `room_id` is non-null.
#[derive(Debug, Clone)]
pub struct MessageRow {
    /// Message identifier.
    pub id: Uuid,
    /// Sending user.
    pub sender_id: String,
    /// Addressed user, for direct messages.
    pub receiver_id: Option<String>,
    /// Addressed room, for room messages.
    pub room_id: Option<Uuid>,
    /// Message text.
    pub body: String,
    /// Server-side accept timestamp.
    pub sent_at: DateTime<Utc>,
}

impl From<&Message> for MessageRow {
    fn from(message: &Message) -> Self {
        let (receiver_id, room_id) = match &message.address {
            Address::Direct { receiver_id } => (Some(receiver_id.as_str().to_owned()), None),
            Address::Room { room_id } => (None, Some(*room_id.as_uuid())),
        };
        Self {
            id: *message.id.as_uuid(),
            sender_id: message.sender_id.as_str().to_owned(),
            receiver_id,
            room_id,
            body: message.body.clone(),
            sent_at: message.sent_at,
        }
    }
}

impl TryFrom<MessageRow> for Message {
    type Error = RelayError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let address = match (row.receiver_id, row.room_id) {
            (Some(receiver), None) => Address::Direct {
                receiver_id: UserId::from(receiver),
            },
            (None, Some(room)) => Address::Room {
                room_id: RoomId::from(room),
            },
            _ => {
                return Err(RelayError::Internal(format!(
                    "message {} violates the one-address invariant",
                    row.id
                )));
            }
        };
        Ok(Self {
            id: MessageId::from(row.id),
            sender_id: UserId::from(row.sender_id),
            address,
            body: row.body,
            sent_at: row.sent_at,
        })
    }
}

/// A row from the `rooms` table.
#[derive(Debug, Clone)]
pub struct RoomRow {
    /// Room identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Creating user.
    pub creator_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            id: RoomId::from(row.id),
            name: row.name,
            creator_id: UserId::from(row.creator_id),
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn direct_message_round_trips_through_row() {
        let msg = Message::direct(UserId::from("a"), UserId::from("b"), "hi".to_string());
        let row = MessageRow::from(&msg);
        assert_eq!(row.receiver_id.as_deref(), Some("b"));
        assert_eq!(row.room_id, None);

        let back = Message::try_from(row).ok();
        assert_eq!(back, Some(msg));
    }

    #[test]
    fn room_message_round_trips_through_row() {
        let room = RoomId::new();
        let msg = Message::room(UserId::from("a"), room, "hi".to_string());
        let row = MessageRow::from(&msg);
        assert_eq!(row.receiver_id, None);
        assert_eq!(row.room_id, Some(*room.as_uuid()));

        let back = Message::try_from(row).ok();
        assert_eq!(back, Some(msg));
    }

    #[test]
    fn row_with_no_address_is_rejected() {
        let row = MessageRow {
            id: Uuid::new_v4(),
            sender_id: "a".to_string(),
            receiver_id: None,
            room_id: None,
            body: "hi".to_string(),
            sent_at: Utc::now(),
        };
        assert!(Message::try_from(row).is_err());
    }
}
