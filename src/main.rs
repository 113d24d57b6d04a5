//! internhub-relay server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use internhub_relay::api;
use internhub_relay::app_state::AppState;
use internhub_relay::config::{DEV_AUTH_SECRET, RelayConfig};
use internhub_relay::persistence::{MemoryStore, MessageStore, PostgresStore};
use internhub_relay::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = RelayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting internhub-relay");

    if config.auth_secret == DEV_AUTH_SECRET {
        tracing::warn!("AUTH_SECRET not set; tokens are verified with the development secret");
    }

    // Build the storage backend
    let store = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("connected to postgres");
        MessageStore::Postgres(PostgresStore::new(pool))
    } else {
        tracing::warn!("persistence disabled; message history will not survive a restart");
        MessageStore::Memory(MemoryStore::new())
    };

    // Build application state
    let app_state = AppState::new(store, &config.auth_secret);
    let registry = Arc::clone(&app_state.registry);

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let app = app.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs").url(
            "/api-docs/openapi.json",
            <api::ApiDoc as utoipa::OpenApi>::openapi(),
        ),
    );

    let app = app
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("shutdown signal received; closing live connections");
            registry.close_all().await;
        })
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
