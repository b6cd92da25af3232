//! Route definitions

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Draft API (v1)
        .route("/v1/drafts", post(handlers::drafts::create_draft))
        .route("/v1/drafts/stream", post(handlers::drafts::create_draft_stream))
        // Path used by existing front ends
        .route("/draft-emails", post(handlers::drafts::create_draft))
        .with_state(state)
}

/// Router plus the middleware stack configured for `server`
pub fn create_app(state: AppState) -> Router {
    let server = state.config.server.clone();
    let app = create_router(state)
        .layer(RequestBodyLimitLayer::new(server.max_body_size_bytes))
        .layer(TraceLayer::new_for_http());

    if server.cors_enabled {
        app.layer(cors_layer(&server))
    } else {
        app
    }
}

/// Any origin when none are listed, otherwise exactly the listed ones
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse()
                .inspect_err(|_| warn!(%origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
