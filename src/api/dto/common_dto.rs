//! Shared DTO types used across multiple endpoints.

use serde::Deserialize;

/// History query parameters for message-list endpoints.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct HistoryParams {
    /// Maximum number of messages to return. The cut keeps the most
    /// recent messages; the response stays in ascending order. Unset
    /// returns the full history.
    pub limit: Option<u32>,
}

impl HistoryParams {
    /// Upper bound for `limit`.
    pub const MAX_LIMIT: u32 = 500;

    /// Clamps `limit` to `1..=500` as a database bind value.
    #[must_use]
    pub fn clamped_limit(&self) -> Option<i64> {
        self.limit.map(|l| i64::from(l.clamp(1, Self::MAX_LIMIT)))
    }
}
