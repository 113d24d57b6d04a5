//! Axum WebSocket upgrade handler.

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::error::RelayError;

/// Close code sent when the upgrade token does not verify.
pub const CLOSE_UNAUTHORIZED: u16 = 4001;

/// Query parameters for the WebSocket upgrade.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Bearer token. Carried in the query string because browsers
    /// cannot set headers on a WebSocket handshake.
    token: Option<String>,
}

/// `GET /ws?token=<bearer>` — upgrade to WebSocket.
///
/// A bad or missing token still upgrades, so the client receives a
/// close frame it can read, and is then closed with code 4001 before
/// any relay traffic.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let verified = params
        .token
        .as_deref()
        .ok_or_else(|| RelayError::Unauthorized("missing token".to_string()))
        .and_then(|token| state.verifier.verify(token));

    match verified {
        Ok(user) => ws.on_upgrade(move |socket| run_connection(socket, state, user)),
        Err(err) => {
            tracing::debug!(error = %err, "ws upgrade rejected");
            ws.on_upgrade(move |socket| close_unauthorized(socket, err))
        }
    }
}

async fn close_unauthorized(mut socket: WebSocket, err: RelayError) {
    let frame = CloseFrame {
        code: CLOSE_UNAUTHORIZED,
        reason: err.to_string().into(),
    };
    let _ = socket.send(Message::Close(Some(frame))).await;
}
