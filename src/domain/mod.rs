//! Domain layer: identifiers, messages, rooms, server events, and the
//! live connection registry.
//!
//! This module contains the relay's core model: type-safe IDs, the
//! message aggregate with its one-address invariant, room records, the
//! events pushed to WebSocket clients, and the in-memory registry that
//! maps users and rooms to live connections.

pub mod event;
pub mod ids;
pub mod message;
pub mod registry;
pub mod room;

pub use event::ServerEvent;
pub use ids::{ConnectionId, MessageId, RoomId, UserId};
pub use message::{Address, Message};
pub use registry::{ConnectionHandle, ConnectionRegistry};
pub use room::Room;
