//! Database connection management for LanceDB

use lancedb::{connect, Connection};
use std::path::Path;

use crate::error::StorageError;

/// Open the LanceDB database at `data_dir`, creating the directory if needed
pub async fn create_connection(data_dir: &Path) -> Result<Connection, StorageError> {
  ensure_data_directory_exists(data_dir)?;

  connect(&data_dir.to_string_lossy())
    .execute()
    .await
    .map_err(|e| StorageError::Unavailable(format!("failed to connect to LanceDB: {e}")))
}

fn ensure_data_directory_exists(data_dir: &Path) -> Result<(), StorageError> {
  if !data_dir.exists() {
    std::fs::create_dir_all(data_dir).map_err(|e| {
      StorageError::Unavailable(format!("failed to create data directory {}: {e}", data_dir.display()))
    })?;
  }
  Ok(())
}
