//! Server-to-client events pushed over WebSocket.
//!
//! Every delivery and command failure reaches a client as a
//! [`ServerEvent`], serialized as JSON with a `type` discriminator.
//! Events are queued on the per-connection channel held by the
//! [`super::ConnectionRegistry`].

use serde::Serialize;

use super::Message;
use crate::error::RelayError;

/// Event pushed to a WebSocket client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A direct message addressed to this connection's user.
    ReceiveMessage {
        /// The delivered message.
        message: Message,
    },

    /// A message sent to a room this connection has joined.
    ReceiveRoomMessage {
        /// The delivered message.
        message: Message,
    },

    /// A command from this connection failed; nobody else is notified.
    Error {
        /// Numeric error code (same table as the REST API).
        code: u32,
        /// Human-readable error message.
        message: String,
    },
}

impl ServerEvent {
    /// Wraps a direct message for delivery.
    #[must_use]
    pub const fn direct(message: Message) -> Self {
        Self::ReceiveMessage { message }
    }

    /// Wraps a room message for delivery.
    #[must_use]
    pub const fn room(message: Message) -> Self {
        Self::ReceiveRoomMessage { message }
    }

    /// Builds an error event from a relay error.
    #[must_use]
    pub fn error(err: &RelayError) -> Self {
        Self::Error {
            code: err.error_code(),
            message: err.to_string(),
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ReceiveMessage { .. } => "receive_message",
            Self::ReceiveRoomMessage { .. } => "receive_room_message",
            Self::Error { .. } => "error",
        }
    }
}
