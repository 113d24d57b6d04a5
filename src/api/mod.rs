//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Chat endpoints are mounted under `/api`; system endpoints live at
//! the root. All `/api` routes require a bearer token.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes())
}

/// OpenAPI document for the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "internhub-relay",
        description = "Real-time messaging relay for the InternHub placement platform: \
                       direct and room chat over WebSocket, with REST endpoints for room \
                       management and message history."
    ),
    paths(
        handlers::rooms::create_room,
        handlers::rooms::list_rooms,
        handlers::rooms::room_messages,
        handlers::messages::direct_messages,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Rooms", description = "Room creation, catalog, and history"),
        (name = "Messages", description = "Direct-message history"),
        (name = "System", description = "Health and diagnostics"),
    )
)]
pub struct ApiDoc;
