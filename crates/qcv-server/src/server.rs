//! Axum server setup and routing.

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::api;
use crate::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.config.server.cors_origins);
    let artifacts = ServeDir::new(state.store.root());

    Router::new()
        .route("/", get(api::root::root))
        .route("/health", get(api::health::health))
        .route("/circuit", post(api::circuit::create_circuit_image))
        .route("/dynamics", post(api::dynamics::create_dynamics_image))
        .route("/download/{file_name}", get(api::download::download))
        .nest_service("/static", artifacts)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

/// Build a CORS layer from `"*"` or a comma-separated origin list. Methods
/// and headers are always unrestricted.
fn build_cors_layer(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.trim() == "*" {
        layer.allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|o| o.trim().parse().ok())
            .collect();
        layer.allow_origin(allowed)
    }
}
