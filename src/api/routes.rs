//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::{self, AppState};

/// Create the application router
pub fn app_routes(state: AppState) -> Router {
    Router::new()
        // Query form
        .route("/", get(handlers::index))
        // Health check
        .route("/api/health", get(handlers::health))
        // Query endpoint
        .route("/api/ask", post(handlers::ask))
        .with_state(state)
}
