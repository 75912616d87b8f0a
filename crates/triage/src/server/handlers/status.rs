//! Health and statistics endpoint handlers

use axum::{extract::State, response::Json};

use crate::server::state::AppState;
use crate::server::types::{HealthResponse, StatsResponse, VectorDbStats, SERVICE_NAME};

/// GET /health - Liveness check
pub async fn health() -> Json<HealthResponse> {
  Json(HealthResponse { status: "healthy".to_string(), service: SERVICE_NAME.to_string() })
}

/// GET /stats - Vector index counters and the active chat model
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
  let vector_db = match state.retriever.stats().await {
    Ok(stats) => VectorDbStats::Available(stats),
    Err(e) => {
      tracing::warn!("vector index statistics unavailable: {e}");
      VectorDbStats::Unavailable { error: e.to_string() }
    }
  };

  Json(StatsResponse { vector_db: Some(vector_db), model: state.model_name.clone() })
}
