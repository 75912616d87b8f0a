//! Shared handles injected into every handler

use std::sync::Arc;

use crate::index::VectorIndex;
use crate::llm::{CompletionClient, EmbeddingClient};
use crate::pipeline::{Classifier, Retriever, Summarizer};

#[derive(Clone)]
pub struct AppState {
  pub classifier: Arc<Classifier>,
  pub summarizer: Arc<Summarizer>,
  pub retriever: Arc<Retriever>,
  /// Chat model name reported by /stats
  pub model_name: String,
}

impl AppState {
  /// Wire the pipeline components around one completion backend and one index
  pub fn from_clients(
    completion: Arc<dyn CompletionClient>,
    embedder: Arc<dyn EmbeddingClient>,
    index: Arc<dyn VectorIndex>,
    model_name: impl Into<String>,
  ) -> Self {
    Self {
      classifier: Arc::new(Classifier::new(completion.clone())),
      summarizer: Arc::new(Summarizer::new(completion)),
      retriever: Arc::new(Retriever::new(embedder, index)),
      model_name: model_name.into(),
    }
  }
}
