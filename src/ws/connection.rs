//! WebSocket connection actor.
//!
//! One task per socket runs [`run_connection`]: a select loop over the
//! client's inbound frames and the connection's outbound event channel.
//! The registry owns the only sender half of that channel, so dropping
//! it (disconnect cleanup or [`close_all`]) ends the loop.
//!
//! [`close_all`]: crate::domain::ConnectionRegistry::close_all

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::ClientCommand;
use crate::app_state::AppState;
use crate::domain::{ConnectionId, ServerEvent, UserId};
use crate::error::RelayError;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them; failures go
///   back to this connection as `error` events.
/// - Forwards events queued by the relay to the client.
/// - On any exit path, unregisters the connection from every index.
pub async fn run_connection(socket: WebSocket, state: AppState, user: UserId) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let connection_id = ConnectionId::new();
    state.registry.connect(connection_id, event_tx).await;
    tracing::debug!(connection = %connection_id, user = %user, "ws connection opened");

    loop {
        tokio::select! {
            // Incoming frame from client
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let reply = dispatch_text(&text, connection_id, &user, &state).await;
                        if let Some(event) = reply {
                            let json = serde_json::to_string(&event).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            // Event queued for this connection by the relay
            event = event_rx.recv() => {
                match event {
                    Some(event) => {
                        let json = serde_json::to_string(&event).unwrap_or_default();
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    // Registry dropped our sender: shutdown in progress.
                    None => {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
        }
    }

    state.registry.unregister(connection_id).await;
    tracing::debug!(connection = %connection_id, user = %user, "ws connection closed");
}

/// Parses one text frame and dispatches it, returning the event to send
/// back to this connection, if any.
async fn dispatch_text(
    text: &str,
    connection_id: ConnectionId,
    user: &UserId,
    state: &AppState,
) -> Option<ServerEvent> {
    let command = match serde_json::from_str::<ClientCommand>(text) {
        Ok(command) => command,
        Err(e) => {
            let err = RelayError::InvalidRequest(e.to_string());
            return Some(ServerEvent::error(&err));
        }
    };
    handle_command(command, connection_id, user, state).await
}

async fn handle_command(
    command: ClientCommand,
    connection_id: ConnectionId,
    user: &UserId,
    state: &AppState,
) -> Option<ServerEvent> {
    match command {
        ClientCommand::Join => {
            state.registry.register(user, connection_id).await;
            tracing::debug!(connection = %connection_id, user = %user, "registered for direct delivery");
            None
        }
        ClientCommand::JoinRoom { room_id } => {
            state.registry.join_room(connection_id, room_id).await;
            tracing::debug!(connection = %connection_id, %room_id, "joined room");
            None
        }
        ClientCommand::LeaveRoom { room_id } => {
            state.registry.leave_room(connection_id, room_id).await;
            tracing::debug!(connection = %connection_id, %room_id, "left room");
            None
        }
        ClientCommand::SendMessage { receiver_id, body } => {
            match state.relay.send_direct(user, &receiver_id, body).await {
                Ok(_) => None,
                Err(err) => Some(ServerEvent::error(&err)),
            }
        }
        ClientCommand::SendRoomMessage { room_id, body } => {
            match state.relay.send_to_room(user, room_id, body).await {
                Ok(_) => None,
                Err(err) => Some(ServerEvent::error(&err)),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::RoomId;
    use crate::persistence::{MemoryStore, MessageStore};

    fn make_state() -> AppState {
        AppState::new(MessageStore::Memory(MemoryStore::new()), "test-secret")
    }

    async fn open_connection(state: &AppState) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new();
        state.registry.connect(id, tx).await;
        (id, rx)
    }

    #[tokio::test]
    async fn malformed_json_yields_an_error_event() {
        let state = make_state();
        let user = UserId::from("alice");
        let (id, _rx) = open_connection(&state).await;

        let reply = dispatch_text("{not json", id, &user, &state).await;
        let Some(ServerEvent::Error { code, .. }) = reply else {
            panic!("expected an error event");
        };
        assert_eq!(code, 1003);
    }

    #[tokio::test]
    async fn unknown_command_yields_an_error_event() {
        let state = make_state();
        let user = UserId::from("alice");
        let (id, _rx) = open_connection(&state).await;

        let reply = dispatch_text(r#"{"type":"shout","body":"x"}"#, id, &user, &state).await;
        assert!(matches!(reply, Some(ServerEvent::Error { code: 1003, .. })));
    }

    #[tokio::test]
    async fn join_registers_the_token_identity() {
        let state = make_state();
        let user = UserId::from("alice");
        let (id, _rx) = open_connection(&state).await;

        // Client-supplied identity is ignored; the token identity wins.
        let reply = dispatch_text(r#"{"type":"join","user_id":"mallory"}"#, id, &user, &state).await;
        assert!(reply.is_none());

        assert_eq!(state.registry.connections_for_user(&user).await.len(), 1);
        assert!(
            state
                .registry
                .connections_for_user(&UserId::from("mallory"))
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn empty_body_send_reports_back_to_sender_only() {
        let state = make_state();
        let user = UserId::from("alice");
        let (id, _rx) = open_connection(&state).await;

        let reply = dispatch_text(
            r#"{"type":"send_message","receiver_id":"bob","body":""}"#,
            id,
            &user,
            &state,
        )
        .await;
        assert!(matches!(reply, Some(ServerEvent::Error { code: 1001, .. })));
    }

    #[tokio::test]
    async fn join_room_then_send_delivers_through_the_registry() {
        let state = make_state();
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");
        let room = RoomId::new();
        let (alice_id, _alice_rx) = open_connection(&state).await;
        let (bob_id, mut bob_rx) = open_connection(&state).await;

        let join = format!(r#"{{"type":"join_room","room_id":"{room}"}}"#);
        assert!(dispatch_text(&join, bob_id, &bob, &state).await.is_none());

        let send = format!(r#"{{"type":"send_room_message","room_id":"{room}","body":"hi"}}"#);
        assert!(dispatch_text(&send, alice_id, &alice, &state).await.is_none());

        let Some(ServerEvent::ReceiveRoomMessage { message }) = bob_rx.recv().await else {
            panic!("joined connection got no room event");
        };
        assert_eq!(message.sender_id, alice);
        assert_eq!(message.body, "hi");
    }

    #[tokio::test]
    async fn leave_room_stops_future_deliveries() {
        let state = make_state();
        let bob = UserId::from("bob");
        let room = RoomId::new();
        let (bob_id, mut bob_rx) = open_connection(&state).await;

        let join = format!(r#"{{"type":"join_room","room_id":"{room}"}}"#);
        let _ = dispatch_text(&join, bob_id, &bob, &state).await;
        let leave = format!(r#"{{"type":"leave_room","room_id":"{room}"}}"#);
        let _ = dispatch_text(&leave, bob_id, &bob, &state).await;

        let send = format!(r#"{{"type":"send_room_message","room_id":"{room}","body":"hi"}}"#);
        let _ = dispatch_text(&send, bob_id, &bob, &state).await;

        assert!(bob_rx.try_recv().is_err());
    }
}
