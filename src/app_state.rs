//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::domain::ConnectionRegistry;
use crate::persistence::MessageStore;
use crate::service::{MessageRelay, RoomDirectory};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Message relay for sends over any transport.
    pub relay: Arc<MessageRelay>,
    /// Room directory for creation and history reads.
    pub directory: Arc<RoomDirectory>,
    /// Live connection registry (explicit lifecycle, closed on shutdown).
    pub registry: Arc<ConnectionRegistry>,
    /// Bearer-token verifier shared by REST and WebSocket auth.
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    /// Wires the full collaborator graph over the given store and
    /// signing secret.
    #[must_use]
    pub fn new(store: MessageStore, auth_secret: &str) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            relay: Arc::new(MessageRelay::new(store.clone(), Arc::clone(&registry))),
            directory: Arc::new(RoomDirectory::new(store)),
            registry,
            verifier: Arc::new(TokenVerifier::new(auth_secret)),
        }
    }
}
