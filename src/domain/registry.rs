//! Live connection tracking with user and room delivery indexes.
//!
//! [`ConnectionRegistry`] is the in-memory map from users and rooms to
//! the WebSocket connections that should receive their traffic. It is
//! constructed once in `main`, handed to collaborators behind an `Arc`,
//! and drained by [`ConnectionRegistry::close_all`] on shutdown. Nothing
//! here is persisted: a restart forgets every connection and membership,
//! and clients are expected to reconnect and rejoin.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;

use super::event::ServerEvent;
use super::{ConnectionId, RoomId, UserId};

/// Outbound handle to one live connection.
///
/// Cheap to clone; delivery goes through the connection's unbounded
/// channel, so sending never blocks the caller.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    /// The connection this handle delivers to.
    pub id: ConnectionId,
    sender: UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    /// Queues an event for this connection.
    ///
    /// Returns `false` when the connection task has already gone away.
    /// Callers treat that as a skipped delivery, not a failure.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

#[derive(Debug)]
struct ConnectionEntry {
    sender: UnboundedSender<ServerEvent>,
    user: Option<UserId>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    users: HashMap<UserId, HashSet<ConnectionId>>,
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
    joined: HashMap<ConnectionId, HashSet<RoomId>>,
}

/// Registry of live WebSocket connections.
///
/// Four indexes behind one `RwLock`: connection → outbound channel,
/// user → connections (multi-device), room → joined connections, and
/// connection → joined rooms (the reverse index that makes disconnect
/// cleanup O(rooms joined) instead of a full scan).
///
/// # Concurrency
///
/// Mutations (connect, register, join, leave, unregister) take the
/// write lock briefly. Delivery lookups take the read lock, clone the
/// handles, and release before anything awaits.
#[derive(Debug)]
pub struct ConnectionRegistry {
    inner: RwLock<RegistryInner>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// Records a newly opened connection and takes ownership of its
    /// outbound channel.
    ///
    /// The connection is not yet bound to a user; it can already join
    /// rooms and receive room traffic.
    pub async fn connect(&self, id: ConnectionId, sender: UnboundedSender<ServerEvent>) {
        let mut inner = self.inner.write().await;
        inner
            .connections
            .insert(id, ConnectionEntry { sender, user: None });
    }

    /// Binds a connection to a user for direct-message delivery.
    ///
    /// Idempotent: registering the same pair twice is a no-op. A no-op
    /// for unknown connections (the socket may have closed in between).
    pub async fn register(&self, user: &UserId, id: ConnectionId) {
        let mut inner = self.inner.write().await;
        let Some(entry) = inner.connections.get_mut(&id) else {
            return;
        };
        if entry.user.as_ref() == Some(user) {
            return;
        }
        let previous = entry.user.replace(user.clone());
        if let Some(previous) = previous
            && let Some(set) = inner.users.get_mut(&previous)
        {
            set.remove(&id);
            if set.is_empty() {
                inner.users.remove(&previous);
            }
        }
        inner.users.entry(user.clone()).or_default().insert(id);
    }

    /// Adds a connection to a room's delivery set.
    ///
    /// Idempotent; a no-op for unknown connections. No membership is
    /// required to send to a room, only to receive from it.
    pub async fn join_room(&self, id: ConnectionId, room: RoomId) {
        let mut inner = self.inner.write().await;
        if !inner.connections.contains_key(&id) {
            return;
        }
        inner.rooms.entry(room).or_default().insert(id);
        inner.joined.entry(id).or_default().insert(room);
    }

    /// Removes a connection from a room's delivery set.
    ///
    /// A no-op if the connection never joined or is unknown.
    pub async fn leave_room(&self, id: ConnectionId, room: RoomId) {
        let mut inner = self.inner.write().await;
        if let Some(set) = inner.rooms.get_mut(&room) {
            set.remove(&id);
            if set.is_empty() {
                inner.rooms.remove(&room);
            }
        }
        if let Some(set) = inner.joined.get_mut(&id) {
            set.remove(&room);
            if set.is_empty() {
                inner.joined.remove(&id);
            }
        }
    }

    /// Removes a connection from every index.
    ///
    /// Called from the connection task's teardown, which also covers
    /// abrupt socket errors. Idempotent.
    pub async fn unregister(&self, id: ConnectionId) {
        let mut inner = self.inner.write().await;
        let Some(entry) = inner.connections.remove(&id) else {
            return;
        };
        if let Some(user) = entry.user
            && let Some(set) = inner.users.get_mut(&user)
        {
            set.remove(&id);
            if set.is_empty() {
                inner.users.remove(&user);
            }
        }
        if let Some(rooms) = inner.joined.remove(&id) {
            for room in rooms {
                if let Some(set) = inner.rooms.get_mut(&room) {
                    set.remove(&id);
                    if set.is_empty() {
                        inner.rooms.remove(&room);
                    }
                }
            }
        }
    }

    /// Returns handles for every live connection of a user.
    ///
    /// Empty when the user has no open connections; delivery to an
    /// offline user is simply a zero-recipient fan-out.
    pub async fn connections_for_user(&self, user: &UserId) -> Vec<ConnectionHandle> {
        let inner = self.inner.read().await;
        let Some(ids) = inner.users.get(user) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| {
                inner.connections.get(id).map(|entry| ConnectionHandle {
                    id: *id,
                    sender: entry.sender.clone(),
                })
            })
            .collect()
    }

    /// Returns handles for every connection currently joined to a room.
    pub async fn connections_in_room(&self, room: RoomId) -> Vec<ConnectionHandle> {
        let inner = self.inner.read().await;
        let Some(ids) = inner.rooms.get(&room) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| {
                inner.connections.get(id).map(|entry| ConnectionHandle {
                    id: *id,
                    sender: entry.sender.clone(),
                })
            })
            .collect()
    }

    /// Returns the number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }

    /// Returns how many connections are joined to a room.
    pub async fn room_member_count(&self, room: RoomId) -> usize {
        self.inner
            .read()
            .await
            .rooms
            .get(&room)
            .map_or(0, HashSet::len)
    }

    /// Drops every connection's outbound sender and clears all indexes.
    ///
    /// Connection tasks observe their channel closing and wind down;
    /// used on graceful shutdown.
    pub async fn close_all(&self) {
        let mut inner = self.inner.write().await;
        inner.connections.clear();
        inner.users.clear();
        inner.rooms.clear();
        inner.joined.clear();
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Message;
    use tokio::sync::mpsc;

    fn wired() -> (ConnectionId, UnboundedSender<ServerEvent>, mpsc::UnboundedReceiver<ServerEvent>)
    {
        let (tx, rx) = mpsc::unbounded_channel();
        (ConnectionId::new(), tx, rx)
    }

    #[tokio::test]
    async fn register_indexes_the_connection_under_its_user() {
        let registry = ConnectionRegistry::new();
        let (id, tx, _rx) = wired();
        let user = UserId::from("alice");

        registry.connect(id, tx).await;
        registry.register(&user, id).await;

        let handles = registry.connections_for_user(&user).await;
        assert_eq!(handles.len(), 1);
        let Some(handle) = handles.first() else {
            panic!("expected a handle");
        };
        assert_eq!(handle.id, id);
    }

    #[tokio::test]
    async fn one_user_many_devices_gets_all_handles() {
        let registry = ConnectionRegistry::new();
        let user = UserId::from("alice");
        let (id_a, tx_a, mut rx_a) = wired();
        let (id_b, tx_b, mut rx_b) = wired();

        registry.connect(id_a, tx_a).await;
        registry.connect(id_b, tx_b).await;
        registry.register(&user, id_a).await;
        registry.register(&user, id_b).await;

        let handles = registry.connections_for_user(&user).await;
        assert_eq!(handles.len(), 2);

        let msg = Message::direct(UserId::from("bob"), user, "hi".to_string());
        for handle in &handles {
            assert!(handle.send(ServerEvent::direct(msg.clone())));
        }
        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());
    }

    #[tokio::test]
    async fn register_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (id, tx, _rx) = wired();
        let user = UserId::from("alice");

        registry.connect(id, tx).await;
        registry.register(&user, id).await;
        registry.register(&user, id).await;

        assert_eq!(registry.connections_for_user(&user).await.len(), 1);
    }

    #[tokio::test]
    async fn register_unknown_connection_is_a_noop() {
        let registry = ConnectionRegistry::new();
        let user = UserId::from("ghost");
        registry.register(&user, ConnectionId::new()).await;
        assert!(registry.connections_for_user(&user).await.is_empty());
    }

    #[tokio::test]
    async fn join_room_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (id, tx, _rx) = wired();
        let room = RoomId::new();

        registry.connect(id, tx).await;
        registry.join_room(id, room).await;
        registry.join_room(id, room).await;

        assert_eq!(registry.room_member_count(room).await, 1);
    }

    #[tokio::test]
    async fn join_room_without_connect_is_a_noop() {
        let registry = ConnectionRegistry::new();
        let room = RoomId::new();
        registry.join_room(ConnectionId::new(), room).await;
        assert_eq!(registry.room_member_count(room).await, 0);
    }

    #[tokio::test]
    async fn unjoined_connection_receives_no_room_traffic() {
        let registry = ConnectionRegistry::new();
        let room = RoomId::new();
        let (id_in, tx_in, _rx_in) = wired();
        let (id_out, tx_out, _rx_out) = wired();

        registry.connect(id_in, tx_in).await;
        registry.connect(id_out, tx_out).await;
        registry.join_room(id_in, room).await;

        let handles = registry.connections_in_room(room).await;
        assert_eq!(handles.len(), 1);
        let Some(handle) = handles.first() else {
            panic!("expected a handle");
        };
        assert_eq!(handle.id, id_in);
    }

    #[tokio::test]
    async fn leave_room_stops_delivery_and_tolerates_repeats() {
        let registry = ConnectionRegistry::new();
        let room = RoomId::new();
        let (id, tx, _rx) = wired();

        registry.connect(id, tx).await;
        registry.join_room(id, room).await;
        registry.leave_room(id, room).await;
        registry.leave_room(id, room).await;

        assert_eq!(registry.room_member_count(room).await, 0);
        // Leaving a room never joined is also fine.
        registry.leave_room(id, RoomId::new()).await;
    }

    #[tokio::test]
    async fn unregister_cleans_every_index() {
        let registry = ConnectionRegistry::new();
        let user = UserId::from("alice");
        let room_a = RoomId::new();
        let room_b = RoomId::new();
        let (id, tx, _rx) = wired();

        registry.connect(id, tx).await;
        registry.register(&user, id).await;
        registry.join_room(id, room_a).await;
        registry.join_room(id, room_b).await;

        registry.unregister(id).await;

        assert_eq!(registry.connection_count().await, 0);
        assert!(registry.connections_for_user(&user).await.is_empty());
        assert_eq!(registry.room_member_count(room_a).await, 0);
        assert_eq!(registry.room_member_count(room_b).await, 0);

        // Idempotent.
        registry.unregister(id).await;
    }

    #[tokio::test]
    async fn unregister_leaves_other_devices_untouched() {
        let registry = ConnectionRegistry::new();
        let user = UserId::from("alice");
        let (id_a, tx_a, _rx_a) = wired();
        let (id_b, tx_b, _rx_b) = wired();

        registry.connect(id_a, tx_a).await;
        registry.connect(id_b, tx_b).await;
        registry.register(&user, id_a).await;
        registry.register(&user, id_b).await;

        registry.unregister(id_a).await;

        let handles = registry.connections_for_user(&user).await;
        assert_eq!(handles.len(), 1);
        let Some(handle) = handles.first() else {
            panic!("expected a handle");
        };
        assert_eq!(handle.id, id_b);
    }

    #[tokio::test]
    async fn send_to_dropped_receiver_reports_skipped() {
        let registry = ConnectionRegistry::new();
        let user = UserId::from("alice");
        let (id, tx, rx) = wired();

        registry.connect(id, tx).await;
        registry.register(&user, id).await;
        drop(rx);

        let handles = registry.connections_for_user(&user).await;
        let Some(handle) = handles.first() else {
            panic!("expected a handle");
        };
        let msg = Message::direct(UserId::from("bob"), user, "hi".to_string());
        assert!(!handle.send(ServerEvent::direct(msg)));
    }

    #[tokio::test]
    async fn close_all_ends_every_outbound_channel() {
        let registry = ConnectionRegistry::new();
        let (id_a, tx_a, mut rx_a) = wired();
        let (id_b, tx_b, mut rx_b) = wired();

        registry.connect(id_a, tx_a).await;
        registry.connect(id_b, tx_b).await;
        registry.close_all().await;

        assert_eq!(registry.connection_count().await, 0);
        assert!(rx_a.recv().await.is_none());
        assert!(rx_b.recv().await.is_none());
    }
}
