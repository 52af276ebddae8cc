//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Search state and setters
        .route("/api/state", get(handlers::state))
        .route("/api/query", put(handlers::set_query))
        .route("/api/license", put(handlers::set_license))
        .route("/api/page", put(handlers::set_page))
        .route("/api/licenses", get(handlers::licenses))
        // Health check
        .route("/health", get(handlers::health))
        // Add middleware
        .layer(cors)
        // Add state
        .with_state(state)
}
