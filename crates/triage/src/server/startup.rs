//! REST server startup and configuration

use anyhow::{anyhow, Result};
use axum::serve;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Settings;
use crate::index::LanceDbIndex;
use crate::llm::{OllamaCompletionClient, OllamaEmbeddingClient};
use crate::server::{routing::create_router, state::AppState};

/// Build the shared clients and vector index described by `settings`
pub async fn build_state(settings: &Settings) -> Result<AppState> {
  tracing::info!(
    backend = %settings.ollama_base_url,
    model = %settings.model_name,
    embedding_model = %settings.embedding_model,
    "initializing model clients"
  );

  let completion = OllamaCompletionClient::new(settings.ollama(), settings.model_name.clone())
    .map_err(|e| anyhow!("Failed to create completion client: {e}"))?;
  let embedder = OllamaEmbeddingClient::new(settings.ollama(), settings.embedding_model.clone())
    .map_err(|e| anyhow!("Failed to create embedding client: {e}"))?;

  let persist_dir = settings.persist_dir();
  let index = LanceDbIndex::open(&persist_dir, &settings.collection_name)
    .await
    .map_err(|e| anyhow!("Failed to open vector index at {}: {e}", persist_dir.display()))?;

  Ok(AppState::from_clients(
    Arc::new(completion),
    Arc::new(embedder),
    Arc::new(index),
    settings.model_name.clone(),
  ))
}

/// Start the REST server and run until interrupted
#[cfg(not(tarpaulin_include))]
pub async fn start_server(settings: Settings) -> Result<()> {
  let state = build_state(&settings).await?;

  let app = create_router(state).layer(
    ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()),
  );

  let listener = TcpListener::bind(settings.bind).await?;
  tracing::info!("Server listening on {}", settings.bind);

  match serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
    Ok(()) => {
      tracing::info!("Server shutdown gracefully");
      Ok(())
    }
    Err(e) => {
      tracing::error!("Server error: {e}");
      Err(anyhow!("Server error: {}", e))
    }
  }
}

#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!("failed to listen for shutdown signal: {e}");
    std::future::pending::<()>().await;
  }
}
