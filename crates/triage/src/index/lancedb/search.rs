//! Vector search operations and result processing for LanceDB

use arrow::array::{Array, Float32Array, StringArray};
use arrow::record_batch::RecordBatch;
use futures::stream::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{DistanceType, Table};

use super::records::{CONTENT_COLUMN, DISTANCE_COLUMN, EMBEDDING_COLUMN, ID_COLUMN, METADATA_COLUMN};
use crate::error::StorageError;
use crate::index::IndexMatch;
use crate::model::DemandMetadata;

/// Exhaustive cosine search over the table, closest first
pub async fn search_nearest(
  table: &Table,
  query_embedding: &[f32],
  limit: usize,
) -> Result<Vec<IndexMatch>, StorageError> {
  let mut results_stream = table
    .vector_search(query_embedding)?
    .column(EMBEDDING_COLUMN)
    .distance_type(DistanceType::Cosine)
    .limit(limit)
    .execute()
    .await
    .map_err(|e| StorageError::Backend(format!("vector search failed: {e}")))?;

  let mut matches = Vec::new();
  while let Some(batch_result) = results_stream.next().await {
    let batch = batch_result.map_err(|e| StorageError::Backend(format!("error reading batch: {e}")))?;
    matches.extend(process_result_batch(&batch)?);
  }

  matches.sort_by(|a, b| a.score.total_cmp(&b.score));
  matches.truncate(limit);

  if matches.is_empty() {
    tracing::debug!("no similar demands found");
  }
  Ok(matches)
}

/// Columns of a result batch needed to build matches
struct BatchColumns<'a> {
  id: &'a StringArray,
  content: &'a StringArray,
  metadata: &'a StringArray,
  distance: &'a Float32Array,
}

fn process_result_batch(batch: &RecordBatch) -> Result<Vec<IndexMatch>, StorageError> {
  let columns = BatchColumns {
    id: string_column(batch, ID_COLUMN)?,
    content: string_column(batch, CONTENT_COLUMN)?,
    metadata: string_column(batch, METADATA_COLUMN)?,
    distance: distance_column(batch)?,
  };

  Ok((0..batch.num_rows()).map(|row| match_at(&columns, row)).collect())
}

fn match_at(columns: &BatchColumns<'_>, row: usize) -> IndexMatch {
  let id = columns.id.value(row).to_string();
  let metadata = decode_metadata(&id, columns.metadata.value(row));
  let score = if columns.distance.is_null(row) { f32::MAX } else { columns.distance.value(row) };

  IndexMatch { id, content: columns.content.value(row).to_string(), metadata, score }
}

fn decode_metadata(id: &str, raw: &str) -> Option<DemandMetadata> {
  match serde_json::from_str(raw) {
    Ok(metadata) => Some(metadata),
    Err(e) => {
      tracing::warn!("stored metadata for {id} does not match the schema: {e}");
      None
    }
  }
}

fn string_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a StringArray, StorageError> {
  batch
    .column_by_name(column_name)
    .ok_or_else(|| StorageError::Backend(format!("missing '{column_name}' column")))?
    .as_any()
    .downcast_ref::<StringArray>()
    .ok_or_else(|| StorageError::Backend(format!("'{column_name}' column is not a string array")))
}

fn distance_column(batch: &RecordBatch) -> Result<&Float32Array, StorageError> {
  batch
    .column_by_name(DISTANCE_COLUMN)
    .and_then(|col| col.as_any().downcast_ref::<Float32Array>())
    .ok_or_else(|| StorageError::Backend("search results carry no distance column".to_string()))
}
