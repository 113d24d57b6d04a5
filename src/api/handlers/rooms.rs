//! Room handlers: create, catalog, history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CreateRoomRequest, CreateRoomResponse, HistoryParams, MessagesResponse, RoomsResponse,
};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::RoomId;
use crate::error::{ErrorResponse, RelayError};

/// `POST /api/rooms` — Create a chat room.
///
/// # Errors
///
/// Returns [`RelayError::EmptyRoomName`] for an empty name.
#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "Rooms",
    summary = "Create a chat room",
    description = "Creates a durable room owned by the authenticated user. Names are labels, not keys: duplicates are allowed.",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = CreateRoomResponse),
        (status = 400, description = "Empty room name", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, RelayError> {
    let room = state.directory.create_room(&user, req.name).await?;
    Ok((StatusCode::CREATED, Json(CreateRoomResponse { ok: true, room })))
}

/// `GET /api/rooms` — List all rooms.
///
/// # Errors
///
/// Returns [`RelayError::Storage`] on query failure.
#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "Rooms",
    summary = "List rooms",
    description = "Returns every room ordered by creation time, so clients can offer rooms to join.",
    responses(
        (status = 200, description = "Room catalog", body = RoomsResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<impl IntoResponse, RelayError> {
    let rooms = state.directory.list_rooms().await?;
    Ok(Json(RoomsResponse { ok: true, rooms }))
}

/// `GET /api/rooms/:room_id/messages` — Room message history.
///
/// # Errors
///
/// Returns [`RelayError::RoomNotFound`] if the room was never created.
#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}/messages",
    tag = "Rooms",
    summary = "Room message history",
    description = "Returns the room's messages ordered by timestamp ascending. With `limit`, keeps the most recent messages.",
    params(
        ("room_id" = uuid::Uuid, Path, description = "Room UUID"),
        HistoryParams,
    ),
    responses(
        (status = 200, description = "Messages in ascending order", body = MessagesResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
    )
)]
pub async fn room_messages(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(room_id): Path<uuid::Uuid>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, RelayError> {
    let room = RoomId::from_uuid(room_id);
    let messages = state
        .directory
        .room_history(room, params.clamped_limit())
        .await?;
    Ok(Json(MessagesResponse { ok: true, messages }))
}

/// Room routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", post(create_room).get(list_rooms))
        .route("/rooms/{room_id}/messages", get(room_messages))
}
