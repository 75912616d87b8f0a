//! Storage and similarity lookup of demands

use std::sync::Arc;

use crate::error::StorageError;
use crate::index::{IndexEntry, VectorIndex};
use crate::llm::EmbeddingClient;
use crate::model::{DemandMetadata, DemandRecord, IndexStats, SimilarityMatch};

/// Number of matches returned when the caller does not ask for more
pub const DEFAULT_SIMILAR_LIMIT: usize = 3;

/// Embeds demand text and keeps it in a [`VectorIndex`]
pub struct Retriever {
  embedder: Arc<dyn EmbeddingClient>,
  index: Arc<dyn VectorIndex>,
}

impl Retriever {
  pub fn new(embedder: Arc<dyn EmbeddingClient>, index: Arc<dyn VectorIndex>) -> Self {
    Self { embedder, index }
  }

  /// Embed and store a demand, replacing any demand stored under the same id
  ///
  /// Nothing is written if embedding fails.
  pub async fn add_demand(
    &self,
    id: &str,
    content: &str,
    metadata: Option<DemandMetadata>,
  ) -> Result<(), StorageError> {
    let id = id.trim();
    if id.is_empty() {
      return Err(StorageError::MissingId);
    }
    if content.trim().is_empty() {
      return Err(StorageError::EmptyContent);
    }

    let record = DemandRecord::new(id, content, metadata);
    let vector = self.embedder.embed(&record.content).await.map_err(|e| {
      tracing::error!("failed to embed demand {id}: {e}");
      StorageError::Embedding(e)
    })?;

    let entry = IndexEntry {
      id: record.id,
      vector,
      content: record.content,
      metadata: record.metadata,
    };
    self.index.upsert(entry).await.map_err(|e| {
      tracing::error!("failed to store demand {id}: {e}");
      e
    })?;

    tracing::info!(collection = self.index.name(), "stored demand {id}");
    Ok(())
  }

  /// Up to `k` stored demands closest to `query`, most similar first
  pub async fn find_similar(&self, query: &str, k: usize) -> Result<Vec<SimilarityMatch>, StorageError> {
    if self.index.count().await? == 0 {
      return Ok(Vec::new());
    }

    let vector = self.embedder.embed(query).await?;
    let matches = self.index.search(&vector, k).await?;

    Ok(
      matches
        .into_iter()
        .map(|m| {
          let demand_id = m.metadata.map(|meta| meta.demand_id).filter(|id| !id.is_empty()).or(Some(m.id));
          SimilarityMatch::new(demand_id, &m.content, m.score)
        })
        .collect(),
    )
  }

  pub async fn stats(&self) -> Result<IndexStats, StorageError> {
    Ok(IndexStats { total_documents: self.index.count().await?, collection_name: self.index.name().to_string() })
  }
}
