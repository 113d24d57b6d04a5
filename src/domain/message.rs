//! Chat message aggregate and its addressing mode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MessageId, RoomId, UserId};

/// Where a message is addressed: exactly one of a user or a room.
///
/// Serialized flattened into [`Message`], so the wire and storage forms
/// carry either a `receiver_id` or a `room_id` field, never both. The
/// enum makes the one-address invariant unrepresentable in process; the
/// `messages` table mirrors it with a `CHECK` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum Address {
    /// Direct message to a single user (all of their devices).
    Direct {
        /// The addressed user.
        receiver_id: UserId,
    },
    /// Message to every connection currently joined to a room.
    Room {
        /// The addressed room.
        room_id: RoomId,
    },
}

/// A relayed chat message.
///
/// One serialized shape everywhere: live `receive_message` /
/// `receive_room_message` events and persisted history rows produce
/// identical JSON, so clients render both with the same code path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Message {
    /// Unique message identifier, assigned at accept time.
    pub id: MessageId,

    /// The verified sender. Always taken from the connection's token
    /// identity, never from client-supplied fields.
    pub sender_id: UserId,

    /// Addressing mode (direct or room).
    #[serde(flatten)]
    pub address: Address,

    /// Message text. Validated non-empty before a `Message` is built.
    pub body: String,

    /// Server-side accept timestamp; the replay order for history.
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// Creates a direct message stamped with the current time.
    #[must_use]
    pub fn direct(sender_id: UserId, receiver_id: UserId, body: String) -> Self {
        Self {
            id: MessageId::new(),
            sender_id,
            address: Address::Direct { receiver_id },
            body,
            sent_at: Utc::now(),
        }
    }

    /// Creates a room message stamped with the current time.
    #[must_use]
    pub fn room(sender_id: UserId, room_id: RoomId, body: String) -> Self {
        Self {
            id: MessageId::new(),
            sender_id,
            address: Address::Room { room_id },
            body,
            sent_at: Utc::now(),
        }
    }

    /// Returns the addressed room, if this is a room message.
    #[must_use]
    pub const fn room_id(&self) -> Option<&RoomId> {
        match &self.address {
            Address::Room { room_id } => Some(room_id),
            Address::Direct { .. } => None,
        }
    }

    /// Returns the addressed user, if this is a direct message.
    #[must_use]
    pub const fn receiver_id(&self) -> Option<&UserId> {
        match &self.address {
            Address::Direct { receiver_id } => Some(receiver_id),
            Address::Room { .. } => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn direct_message_wire_shape() {
        let msg = Message::direct(
            UserId::from("alice"),
            UserId::from("bob"),
            "hello".to_string(),
        );
        let Some(json) = serde_json::to_value(&msg).ok() else {
            panic!("serialization failed");
        };
        assert_eq!(json["sender_id"], "alice");
        assert_eq!(json["receiver_id"], "bob");
        assert_eq!(json["body"], "hello");
        assert!(json.get("room_id").is_none());
        assert!(json.get("sent_at").is_some());
    }

    #[test]
    fn room_message_wire_shape() {
        let room = RoomId::new();
        let msg = Message::room(UserId::from("alice"), room, "hi all".to_string());
        let Some(json) = serde_json::to_value(&msg).ok() else {
            panic!("serialization failed");
        };
        assert_eq!(json["room_id"], room.to_string());
        assert!(json.get("receiver_id").is_none());
    }

    #[test]
    fn deserializes_into_the_right_address_variant() {
        let room = RoomId::new();
        let raw = format!(
            "{{\"id\":\"{}\",\"sender_id\":\"alice\",\"room_id\":\"{}\",\"body\":\"x\",\"sent_at\":\"2026-01-01T00:00:00Z\"}}",
            MessageId::new(),
            room
        );
        let Some(msg) = serde_json::from_str::<Message>(&raw).ok() else {
            panic!("deserialization failed");
        };
        assert_eq!(msg.room_id(), Some(&room));
        assert_eq!(msg.receiver_id(), None);
    }

    #[test]
    fn round_trips_both_variants() {
        let direct = Message::direct(UserId::from("a"), UserId::from("b"), "x".to_string());
        let room = Message::room(UserId::from("a"), RoomId::new(), "y".to_string());
        for msg in [direct, room] {
            let Some(json) = serde_json::to_string(&msg).ok() else {
                panic!("serialization failed");
            };
            let back: Option<Message> = serde_json::from_str(&json).ok();
            assert_eq!(back, Some(msg));
        }
    }
}
