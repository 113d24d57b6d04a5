//! Message history response DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Message;

/// Response envelope for message history endpoints.
///
/// Messages carry the same JSON shape as live WebSocket deliveries, so
/// clients render history and real-time traffic with one code path.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessagesResponse {
    /// Always `true`; failures use the error envelope instead.
    pub ok: bool,
    /// Messages ordered by `sent_at` ascending.
    pub messages: Vec<Message>,
}
