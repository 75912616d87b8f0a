//! LanceDB-backed vector index
//!
//! One table per collection, created on the first upsert. The first vector
//! fixes the table's embedding dimension; every later upsert or search must
//! match it. Each write is a committed LanceDB version, so an upsert is on
//! disk by the time it returns.

pub mod connection;
pub mod records;
pub mod search;
pub mod table_manager;

use async_trait::async_trait;
use std::path::Path;
use tokio::sync::Mutex;

use super::{check_vector, IndexEntry, IndexMatch, VectorIndex};
use crate::error::StorageError;
use connection::create_connection;
use records::DemandRow;
use search::search_nearest;
use table_manager::TableManager;

pub struct LanceDbIndex {
  table_manager: TableManager,
  /// Serializes writers sharing this handle, including first-time table creation
  write_lock: Mutex<()>,
}

impl LanceDbIndex {
  /// Open (or prepare) the collection `collection_name` under `data_dir`
  pub async fn open(data_dir: &Path, collection_name: &str) -> Result<Self, StorageError> {
    let connection = create_connection(data_dir).await?;
    let table_manager = TableManager::new(connection, collection_name.to_string());

    tracing::info!(path = %data_dir.display(), collection = collection_name, "vector index ready");
    Ok(Self { table_manager, write_lock: Mutex::new(()) })
  }
}

#[async_trait]
impl VectorIndex for LanceDbIndex {
  async fn upsert(&self, entry: IndexEntry) -> Result<(), StorageError> {
    if entry.id.is_empty() {
      return Err(StorageError::MissingId);
    }
    check_vector(&entry.vector, None)?;

    let _guard = self.write_lock.lock().await;
    match self.table_manager.open_table().await? {
      Some(table) => {
        let dimension = self.table_manager.dimension(&table).await?;
        check_vector(&entry.vector, Some(dimension))?;
        self.table_manager.upsert_row(&table, DemandRow::from_entry(entry)?).await
      }
      None => self.table_manager.create_table_with_first_row(DemandRow::from_entry(entry)?).await,
    }
  }

  async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<IndexMatch>, StorageError> {
    check_vector(vector, None)?;
    if k == 0 {
      return Ok(Vec::new());
    }

    let Some(table) = self.table_manager.open_table().await? else {
      return Ok(Vec::new());
    };
    if table.count_rows(None).await? == 0 {
      return Ok(Vec::new());
    }

    let dimension = self.table_manager.dimension(&table).await?;
    check_vector(vector, Some(dimension))?;

    search_nearest(&table, vector, k).await
  }

  async fn count(&self) -> Result<usize, StorageError> {
    self.table_manager.count_rows().await
  }

  fn name(&self) -> &str {
    self.table_manager.table_name()
  }
}
