//! Message relay: validate, persist, then fan out.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, Message, RoomId, ServerEvent, UserId};
use crate::error::RelayError;
use crate::persistence::MessageStore;

/// Orchestration layer for message sends.
///
/// Every send follows the same pattern: validate → persist → deliver.
/// Persistence is the commit point; delivery is best effort and a
/// connection that is gone by push time is skipped, never retried.
/// Sender identity always comes from the verified connection, so this
/// layer takes it as a separate argument rather than trusting payloads.
#[derive(Debug, Clone)]
pub struct MessageRelay {
    store: MessageStore,
    registry: Arc<ConnectionRegistry>,
}

impl MessageRelay {
    /// Creates a new `MessageRelay`.
    #[must_use]
    pub fn new(store: MessageStore, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    /// Sends a direct message to every live connection of `receiver`.
    ///
    /// The sender's own connections get nothing back: echoing the
    /// message it just wrote is the client's job. An offline receiver
    /// is still a successful send; the message waits in history.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::EmptyBody`] for an empty body and
    /// [`RelayError::Storage`] when persistence fails. Nothing is
    /// delivered in either case.
    pub async fn send_direct(
        &self,
        sender: &UserId,
        receiver: &UserId,
        body: String,
    ) -> Result<Message, RelayError> {
        if body.is_empty() {
            return Err(RelayError::EmptyBody);
        }
        let message = Message::direct(sender.clone(), receiver.clone(), body);
        self.store.insert_message(&message).await?;

        let handles = self.registry.connections_for_user(receiver).await;
        let mut delivered = 0usize;
        for handle in &handles {
            if handle.send(ServerEvent::direct(message.clone())) {
                delivered += 1;
            } else {
                tracing::debug!(connection = %handle.id, "skipping delivery to closing connection");
            }
        }

        tracing::info!(message_id = %message.id, receiver = %receiver, delivered, "direct message relayed");
        Ok(message)
    }

    /// Sends a message to every connection currently joined to `room`,
    /// including the sender's own connections if they are joined.
    ///
    /// Deliberately permissive: neither the sender's membership nor the
    /// room's existence is checked on the send path. An unknown room
    /// persists the message and fans out to nobody.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::EmptyBody`] for an empty body and
    /// [`RelayError::Storage`] when persistence fails. Nothing is
    /// delivered in either case.
    pub async fn send_to_room(
        &self,
        sender: &UserId,
        room: RoomId,
        body: String,
    ) -> Result<Message, RelayError> {
        if body.is_empty() {
            return Err(RelayError::EmptyBody);
        }
        let message = Message::room(sender.clone(), room, body);
        self.store.insert_message(&message).await?;

        let handles = self.registry.connections_in_room(room).await;
        let mut delivered = 0usize;
        for handle in &handles {
            if handle.send(ServerEvent::room(message.clone())) {
                delivered += 1;
            } else {
                tracing::debug!(connection = %handle.id, "skipping delivery to closing connection");
            }
        }

        tracing::info!(message_id = %message.id, %room, delivered, "room message relayed");
        Ok(message)
    }
}
