//! Direct-message history handler.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{HistoryParams, MessagesResponse};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::UserId;
use crate::error::{ErrorResponse, RelayError};

/// `GET /api/messages/:user_a/:user_b` — Direct conversation history.
///
/// # Errors
///
/// Returns [`RelayError::Storage`] on query failure.
#[utoipa::path(
    get,
    path = "/api/messages/{user_a}/{user_b}",
    tag = "Messages",
    summary = "Direct conversation history",
    description = "Returns both directions of the conversation between two users, ordered by timestamp ascending. Unknown users yield an empty list.",
    params(
        ("user_a" = String, Path, description = "One participant's user ID"),
        ("user_b" = String, Path, description = "The other participant's user ID"),
        HistoryParams,
    ),
    responses(
        (status = 200, description = "Messages in ascending order", body = MessagesResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
    )
)]
pub async fn direct_messages(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path((user_a, user_b)): Path<(String, String)>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, RelayError> {
    let messages = state
        .directory
        .direct_history(
            &UserId::from(user_a),
            &UserId::from(user_b),
            params.clamped_limit(),
        )
        .await?;
    Ok(Json(MessagesResponse { ok: true, messages }))
}

/// Direct-message routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/messages/{user_a}/{user_b}", get(direct_messages))
}
