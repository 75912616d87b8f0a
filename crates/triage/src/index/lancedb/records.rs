//! Arrow RecordBatch conversion for stored demands

use arrow::array::{Array, FixedSizeListBuilder, Float32Builder, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use chrono::Utc;
use std::sync::Arc;

use crate::error::StorageError;
use crate::index::IndexEntry;

pub const ID_COLUMN: &str = "id";
pub const CONTENT_COLUMN: &str = "content";
pub const METADATA_COLUMN: &str = "metadata";
pub const EMBEDDING_COLUMN: &str = "embedding";
pub const STORED_AT_COLUMN: &str = "stored_at";
pub const DISTANCE_COLUMN: &str = "_distance";

/// Row layout of the demand table
#[derive(Debug, Clone)]
pub struct DemandRow {
  pub id: String,
  pub content: String,
  /// `DemandMetadata` serialized as JSON
  pub metadata: String,
  pub embedding: Vec<f32>,
  pub stored_at: String,
}

impl DemandRow {
  pub fn from_entry(entry: IndexEntry) -> Result<Self, StorageError> {
    let metadata = serde_json::to_string(&entry.metadata)
      .map_err(|e| StorageError::Encoding(format!("metadata for {}: {e}", entry.id)))?;

    Ok(Self {
      id: entry.id,
      content: entry.content,
      metadata,
      embedding: entry.vector,
      stored_at: Utc::now().to_rfc3339(),
    })
  }
}

/// Arrow schema for a demand table whose vectors have `dimension` components
pub fn demand_schema(dimension: usize) -> SchemaRef {
  Arc::new(Schema::new(vec![
    Field::new(ID_COLUMN, DataType::Utf8, false),
    Field::new(CONTENT_COLUMN, DataType::Utf8, false),
    Field::new(METADATA_COLUMN, DataType::Utf8, false),
    Field::new(
      EMBEDDING_COLUMN,
      DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dimension as i32),
      false,
    ),
    Field::new(STORED_AT_COLUMN, DataType::Utf8, false),
  ]))
}

/// Vector dimension recorded in a table schema, if it has an embedding column
pub fn schema_dimension(schema: &Schema) -> Option<usize> {
  match schema.field_with_name(EMBEDDING_COLUMN).ok()?.data_type() {
    DataType::FixedSizeList(_, size) => usize::try_from(*size).ok(),
    _ => None,
  }
}

/// Convert rows sharing one dimension into a RecordBatch
pub fn rows_to_arrow_batch(rows: &[DemandRow]) -> Result<RecordBatch, StorageError> {
  let dimension = match rows.first() {
    Some(row) => row.embedding.len(),
    None => return Err(StorageError::Encoding("cannot build a batch from zero rows".to_string())),
  };

  let schema = demand_schema(dimension);
  let columns: Vec<Arc<dyn Array>> = vec![
    Arc::new(string_column(rows, |r| &r.id)),
    Arc::new(string_column(rows, |r| &r.content)),
    Arc::new(string_column(rows, |r| &r.metadata)),
    Arc::new(embedding_column(rows, dimension)?),
    Arc::new(string_column(rows, |r| &r.stored_at)),
  ];

  RecordBatch::try_new(schema, columns)
    .map_err(|e| StorageError::Encoding(format!("failed to create RecordBatch: {e}")))
}

fn string_column<F>(rows: &[DemandRow], field_fn: F) -> StringArray
where
  F: Fn(&DemandRow) -> &str,
{
  StringArray::from(rows.iter().map(|r| Some(field_fn(r))).collect::<Vec<_>>())
}

fn embedding_column(
  rows: &[DemandRow],
  dimension: usize,
) -> Result<arrow::array::FixedSizeListArray, StorageError> {
  let mut builder =
    FixedSizeListBuilder::new(Float32Builder::with_capacity(dimension * rows.len()), dimension as i32);

  for row in rows {
    if row.embedding.len() != dimension {
      return Err(StorageError::DimensionMismatch { expected: dimension, actual: row.embedding.len() });
    }
    builder.values().append_slice(&row.embedding);
    builder.append(true);
  }

  Ok(builder.finish())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::DemandMetadata;

  fn row(id: &str, embedding: Vec<f32>) -> DemandRow {
    DemandRow::from_entry(IndexEntry {
      id: id.to_string(),
      vector: embedding,
      content: format!("content of {id}"),
      metadata: DemandMetadata { demand_id: id.to_string(), ..Default::default() },
    })
    .unwrap()
  }

  #[test]
  fn test_batch_has_expected_shape() {
    let batch = rows_to_arrow_batch(&[row("D1", vec![0.1, 0.2, 0.3]), row("D2", vec![0.4, 0.5, 0.6])])
      .unwrap();

    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 5);
    assert_eq!(schema_dimension(&batch.schema()), Some(3));
  }

  #[test]
  fn test_batch_rejects_mixed_dimensions() {
    let result = rows_to_arrow_batch(&[row("D1", vec![0.1, 0.2]), row("D2", vec![0.1, 0.2, 0.3])]);
    assert!(matches!(result, Err(StorageError::DimensionMismatch { expected: 2, actual: 3 })));
  }

  #[test]
  fn test_batch_rejects_zero_rows() {
    assert!(matches!(rows_to_arrow_batch(&[]), Err(StorageError::Encoding(_))));
  }

  #[test]
  fn test_metadata_is_stored_as_json() {
    let row = row("D9", vec![1.0]);
    let metadata: DemandMetadata = serde_json::from_str(&row.metadata).unwrap();
    assert_eq!(metadata.demand_id, "D9");
  }
}
