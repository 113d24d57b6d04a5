//! Chat room record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RoomId, UserId};

/// A named chat room.
///
/// Rooms are durable and never deleted. Membership is not stored here:
/// it lives per-connection in the registry and evaporates on disconnect.
/// Names are display labels, not keys, so duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Room {
    /// Unique room identifier (immutable after creation).
    pub id: RoomId,

    /// Display name. Validated non-empty at creation.
    pub name: String,

    /// The user who created the room.
    pub creator_id: UserId,

    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Creates a new room stamped with the current time.
    #[must_use]
    pub fn new(name: String, creator_id: UserId) -> Self {
        Self {
            id: RoomId::new(),
            name,
            creator_id,
            created_at: Utc::now(),
        }
    }
}
