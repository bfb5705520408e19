use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.assets_dir);
    let cors = state.cors;

    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Conversion API
        .route("/api/validate", get(handlers::validate_url))
        .route("/api/convert", post(handlers::convert))
        // Staged files
        .route("/downloads/:request_id", get(handlers::download))
        // UI page and scripts
        .fallback_service(assets)
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http());

    let router = if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}
