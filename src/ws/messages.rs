//! Client-to-server WebSocket commands.
//!
//! Tagged JSON with a `type` discriminator. Server-to-client events are
//! [`crate::domain::ServerEvent`]; the two directions share nothing but
//! the discriminator convention.

use serde::Deserialize;

use crate::domain::{RoomId, UserId};

/// Commands a client can send over WebSocket.
///
/// The sender's identity is never read from the payload; it was fixed
/// at upgrade time by the verified token. Unknown fields (for example a
/// client-supplied `user_id` on `join`) are tolerated and ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Bind this connection to its user for direct-message delivery.
    Join,

    /// Start receiving a room's messages on this connection.
    JoinRoom {
        /// Room to join.
        room_id: RoomId,
    },

    /// Stop receiving a room's messages on this connection.
    LeaveRoom {
        /// Room to leave.
        room_id: RoomId,
    },

    /// Send a direct message to a user.
    SendMessage {
        /// Addressed user.
        receiver_id: UserId,
        /// Message text.
        body: String,
    },

    /// Send a message to a room.
    SendRoomMessage {
        /// Addressed room.
        room_id: RoomId,
        /// Message text.
        body: String,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command_shape() {
        let room = RoomId::new();
        let cases = [
            r#"{"type":"join"}"#.to_string(),
            format!(r#"{{"type":"join_room","room_id":"{room}"}}"#),
            format!(r#"{{"type":"leave_room","room_id":"{room}"}}"#),
            r#"{"type":"send_message","receiver_id":"bob","body":"hi"}"#.to_string(),
            format!(r#"{{"type":"send_room_message","room_id":"{room}","body":"hi"}}"#),
        ];
        for raw in &cases {
            assert!(
                serde_json::from_str::<ClientCommand>(raw).is_ok(),
                "failed to parse {raw}"
            );
        }
    }

    #[test]
    fn tolerates_client_supplied_identity_fields() {
        let raw = r#"{"type":"join","user_id":"spoofed"}"#;
        let Some(cmd) = serde_json::from_str::<ClientCommand>(raw).ok() else {
            panic!("join with extra fields must parse");
        };
        assert!(matches!(cmd, ClientCommand::Join));

        let raw = r#"{"type":"send_message","sender_id":"spoofed","receiver_id":"bob","body":"x"}"#;
        let Some(cmd) = serde_json::from_str::<ClientCommand>(raw).ok() else {
            panic!("send_message with extra fields must parse");
        };
        let ClientCommand::SendMessage { receiver_id, .. } = cmd else {
            panic!("wrong variant");
        };
        assert_eq!(receiver_id, UserId::from("bob"));
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(serde_json::from_str::<ClientCommand>(r#"{"type":"shout","body":"x"}"#).is_err());
    }

    #[test]
    fn rejects_missing_required_fields() {
        assert!(serde_json::from_str::<ClientCommand>(r#"{"type":"send_message","body":"x"}"#).is_err());
        assert!(serde_json::from_str::<ClientCommand>(r#"{"type":"join_room"}"#).is_err());
    }
}
