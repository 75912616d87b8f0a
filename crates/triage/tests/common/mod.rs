//! Deterministic stand-ins for the model backends used by integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use triage::error::TransportError;
use triage::index::LanceDbIndex;
use triage::llm::{CompletionClient, CompletionRequest, EmbeddingClient};
use triage::server::state::AppState;

pub const TEST_DIMENSION: usize = 128;
pub const TEST_MODEL: &str = "test-model";

/// Bag-of-words embedder: each lowercase token bumps one hashed bucket
#[derive(Default)]
pub struct HashingEmbedder {
  pub calls: AtomicUsize,
}

impl HashingEmbedder {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

pub fn hash_embedding(text: &str) -> Vec<f32> {
  let mut vector = vec![0.0f32; TEST_DIMENSION];
  for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
    let mut hasher = DefaultHasher::new();
    token.to_lowercase().hash(&mut hasher);
    vector[(hasher.finish() % TEST_DIMENSION as u64) as usize] += 1.0;
  }

  let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
  if norm > 0.0 {
    vector.iter_mut().for_each(|v| *v /= norm);
  } else {
    vector[0] = 1.0;
  }
  vector
}

#[async_trait]
impl EmbeddingClient for HashingEmbedder {
  async fn embed(&self, text: &str) -> Result<Vec<f32>, TransportError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Ok(hash_embedding(text))
  }
}

/// What a [`ScriptedCompletion`] answers with
#[derive(Clone)]
pub enum Reply {
  Text(String),
  Unreachable,
}

/// Completion backend that gives the same reply to every request
pub struct ScriptedCompletion {
  reply: Reply,
  pub calls: AtomicUsize,
}

impl ScriptedCompletion {
  pub fn text(text: &str) -> Self {
    Self { reply: Reply::Text(text.to_string()), calls: AtomicUsize::new(0) }
  }

  pub fn unreachable() -> Self {
    Self { reply: Reply::Unreachable, calls: AtomicUsize::new(0) }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
  async fn complete(&self, _request: CompletionRequest) -> Result<String, TransportError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    match &self.reply {
      Reply::Text(text) => Ok(text.clone()),
      Reply::Unreachable => Err(TransportError::Unreachable {
        endpoint: "http://127.0.0.1:9/api/chat".to_string(),
        message: "connection refused".to_string(),
      }),
    }
  }
}

/// Everything a router test needs; keep it alive for the duration of the test
pub struct TestApp {
  pub state: AppState,
  pub completion: Arc<ScriptedCompletion>,
  pub embedder: Arc<HashingEmbedder>,
  pub dir: TempDir,
}

pub async fn test_app(completion: ScriptedCompletion) -> TestApp {
  let dir = TempDir::new().unwrap();
  let index = LanceDbIndex::open(dir.path(), "demands").await.unwrap();
  let completion = Arc::new(completion);
  let embedder = Arc::new(HashingEmbedder::default());

  let state = AppState::from_clients(completion.clone(), embedder.clone(), Arc::new(index), TEST_MODEL);
  TestApp { state, completion, embedder, dir }
}
