//! Typed failures for the intake pipeline
//!
//! Each layer reports its own error type so the HTTP boundary can tell a model
//! that never answered apart from one that answered badly, and both apart from
//! a storage problem.

use thiserror::Error;

/// The language-model backend could not be reached or did not answer properly
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("request to {endpoint} timed out after {timeout_secs}s")]
  Timeout { endpoint: String, timeout_secs: u64 },

  #[error("backend unreachable at {endpoint}: {message}")]
  Unreachable { endpoint: String, message: String },

  #[error("backend returned HTTP {status}: {body}")]
  Status { status: u16, body: String },

  #[error("malformed backend response: {0}")]
  Protocol(String),
}

impl TransportError {
  /// Classify a reqwest failure against the endpoint it was sent to
  pub fn from_reqwest(endpoint: &str, timeout_secs: u64, err: reqwest::Error) -> Self {
    if err.is_timeout() {
      TransportError::Timeout { endpoint: endpoint.to_string(), timeout_secs }
    } else if err.is_connect() || err.is_request() {
      TransportError::Unreachable { endpoint: endpoint.to_string(), message: err.to_string() }
    } else if err.is_decode() {
      TransportError::Protocol(err.to_string())
    } else {
      TransportError::Unreachable { endpoint: endpoint.to_string(), message: err.to_string() }
    }
  }
}

/// Completion text that did not decode into a valid classification
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ParseError {
  pub message: String,
  /// The completion exactly as the model returned it
  pub raw_text: String,
}

impl ParseError {
  pub fn new(message: impl Into<String>, raw_text: &str) -> Self {
    Self { message: message.into(), raw_text: raw_text.to_string() }
  }
}

/// Failure of the classification pipeline
#[derive(Debug, Error)]
pub enum ClassifyError {
  #[error("classification backend failed: {0}")]
  Transport(#[from] TransportError),

  #[error("classification output could not be parsed: {0}")]
  Parse(#[from] ParseError),
}

/// Failure to store or look up demands in the vector index
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("demand id must not be empty")]
  MissingId,

  #[error("demand content must not be empty")]
  EmptyContent,

  #[error("embedding vector must not be empty")]
  EmptyVector,

  #[error("embedding dimension mismatch: collection uses {expected}, got {actual}")]
  DimensionMismatch { expected: usize, actual: usize },

  #[error("failed to embed demand: {0}")]
  Embedding(#[from] TransportError),

  #[error("vector store unavailable: {0}")]
  Unavailable(String),

  #[error("failed to encode record: {0}")]
  Encoding(String),

  #[error("vector store operation failed: {0}")]
  Backend(String),
}

impl From<lancedb::Error> for StorageError {
  fn from(err: lancedb::Error) -> Self {
    StorageError::Backend(err.to_string())
  }
}

/// Caller input rejected before any backend is contacted
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("content must not be empty")]
  EmptyContent,

  #[error("demand_id is required")]
  MissingDemandId,
}
