//! Room endpoint request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Room;

/// Request body for creating a room.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    /// Display name; must be non-empty.
    pub name: String,
}

/// Response envelope for room creation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRoomResponse {
    /// Always `true`; failures use the error envelope instead.
    pub ok: bool,
    /// The created room.
    pub room: Room,
}

/// Response envelope for the room catalog.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomsResponse {
    /// Always `true`; failures use the error envelope instead.
    pub ok: bool,
    /// All rooms, ordered by creation time.
    pub rooms: Vec<Room>,
}
