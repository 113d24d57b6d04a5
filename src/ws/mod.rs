//! WebSocket layer: upgrade handling, per-connection actors, commands.
//!
//! The endpoint at `/ws` is the relay's primary transport: clients send
//! [`messages::ClientCommand`]s and receive
//! [`crate::domain::ServerEvent`]s.

pub mod connection;
pub mod handler;
pub mod messages;
