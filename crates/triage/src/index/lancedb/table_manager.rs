//! Table management operations for LanceDB

use arrow::record_batch::RecordBatchIterator;
use lancedb::{Connection, Table};

use super::records::{rows_to_arrow_batch, schema_dimension, DemandRow, ID_COLUMN};
use crate::error::StorageError;

/// Owns the connection and knows the name of the demand table
pub struct TableManager {
  connection: Connection,
  table_name: String,
}

impl TableManager {
  pub fn new(connection: Connection, table_name: String) -> Self {
    Self { connection, table_name }
  }

  pub fn table_name(&self) -> &str {
    &self.table_name
  }

  /// Check if the target table exists
  pub async fn table_exists(&self) -> Result<bool, StorageError> {
    let tables = self
      .connection
      .table_names()
      .execute()
      .await
      .map_err(|e| StorageError::Unavailable(format!("failed to list tables: {e}")))?;
    Ok(tables.contains(&self.table_name))
  }

  /// Open the table, or `None` when nothing has been stored yet
  pub async fn open_table(&self) -> Result<Option<Table>, StorageError> {
    if !self.table_exists().await? {
      return Ok(None);
    }

    self
      .connection
      .open_table(&self.table_name)
      .execute()
      .await
      .map(Some)
      .map_err(|e| StorageError::Unavailable(format!("failed to open table '{}': {e}", self.table_name)))
  }

  /// Vector dimension the table was created with
  pub async fn dimension(&self, table: &Table) -> Result<usize, StorageError> {
    let schema = table.schema().await?;
    schema_dimension(&schema).ok_or_else(|| {
      StorageError::Backend(format!("table '{}' has no fixed-size embedding column", self.table_name))
    })
  }

  /// Create the table from its first row; this fixes the collection's dimension
  pub async fn create_table_with_first_row(&self, row: DemandRow) -> Result<(), StorageError> {
    let id = row.id.clone();
    let dimension = row.embedding.len();
    let batch = rows_to_arrow_batch(&[row])?;
    let schema = batch.schema();
    let batch_iter = RecordBatchIterator::new(vec![Ok(batch)], schema);

    self
      .connection
      .create_table(&self.table_name, batch_iter)
      .execute()
      .await
      .map_err(|e| StorageError::Backend(format!("failed to create table with first row: {e}")))?;

    tracing::info!(table = %self.table_name, dimension, "created demand table with first entry {id}");
    Ok(())
  }

  /// Insert the row or replace the row with the same id
  pub async fn upsert_row(&self, table: &Table, row: DemandRow) -> Result<(), StorageError> {
    let id = row.id.clone();
    let batch = rows_to_arrow_batch(&[row])?;
    let schema = batch.schema();
    let batch_iter = RecordBatchIterator::new(vec![Ok(batch)], schema);

    let mut merge = table.merge_insert(&[ID_COLUMN]);
    merge.when_matched_update_all(None).when_not_matched_insert_all();
    merge
      .execute(Box::new(batch_iter))
      .await
      .map_err(|e| StorageError::Backend(format!("failed to upsert demand {id}: {e}")))?;

    tracing::debug!(table = %self.table_name, "upserted demand {id}");
    Ok(())
  }

  /// Number of stored rows, zero when the table does not exist yet
  pub async fn count_rows(&self) -> Result<usize, StorageError> {
    match self.open_table().await? {
      Some(table) => Ok(table.count_rows(None).await?),
      None => Ok(0),
    }
  }
}
