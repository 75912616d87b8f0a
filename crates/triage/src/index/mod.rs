//! Vector index abstraction for demand storage and retrieval
//!
//! The retriever talks to [`VectorIndex`]; [`lancedb::LanceDbIndex`] is the
//! persistent implementation. Scores are cosine distances (`1 - cos θ`, in
//! `[0, 2]`): lower means more similar.

pub mod lancedb;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::model::DemandMetadata;

pub use self::lancedb::LanceDbIndex;

/// The unit persisted inside an index, one per id
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
  pub id: String,
  pub vector: Vec<f32>,
  pub content: String,
  pub metadata: DemandMetadata,
}

/// A single nearest-neighbor hit
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMatch {
  pub id: String,
  pub content: String,
  pub metadata: Option<DemandMetadata>,
  /// Distance from the query vector, lower is closer
  pub score: f32,
}

/// Persistent nearest-neighbor store keyed by id
///
/// Writes to the same id are last-writer-wins. Implementations serialize
/// writes issued through one handle; writers in separate processes are not
/// ordered. Searches see a point-in-time snapshot.
#[async_trait]
pub trait VectorIndex: Send + Sync {
  /// Insert the entry or replace the one stored under the same id
  async fn upsert(&self, entry: IndexEntry) -> Result<(), StorageError>;

  /// Up to `k` entries ordered by increasing distance; empty when nothing is stored
  async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<IndexMatch>, StorageError>;

  async fn count(&self) -> Result<usize, StorageError>;

  fn name(&self) -> &str;
}

/// Reject vectors that could never be stored
pub(crate) fn check_vector(vector: &[f32], expected: Option<usize>) -> Result<(), StorageError> {
  if vector.is_empty() {
    return Err(StorageError::EmptyVector);
  }
  match expected {
    Some(expected) if expected != vector.len() => {
      Err(StorageError::DimensionMismatch { expected, actual: vector.len() })
    }
    _ => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_check_vector() {
    assert!(matches!(check_vector(&[], None), Err(StorageError::EmptyVector)));
    assert!(check_vector(&[0.1, 0.2], None).is_ok());
    assert!(check_vector(&[0.1, 0.2], Some(2)).is_ok());
    assert!(matches!(
      check_vector(&[0.1, 0.2], Some(3)),
      Err(StorageError::DimensionMismatch { expected: 3, actual: 2 })
    ));
  }
}
