//! Axum router configuration for all endpoints

use axum::{
  middleware,
  routing::{get, post},
  Router,
};

use crate::server::handlers::{demands, status};
use crate::server::middleware::request_context_middleware;
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Status endpoints
    .route("/health", get(status::health))
    .route("/stats", get(status::stats))
    // Demand endpoints
    .route("/classify", post(demands::classify))
    .route("/summarize", post(demands::summarize))
    .route("/similar", post(demands::find_similar))
    .route("/store", post(demands::store))
    .layer(middleware::from_fn(request_context_middleware))
    .with_state(state)
}
