//! Language-model backends
//!
//! The pipeline only sees the two traits below; the Ollama implementations
//! live in [`ollama`]. Handles are shared as `Arc<dyn ...>` and must be safe
//! to call from many requests at once.

pub mod ollama;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

pub use ollama::{OllamaCompletionClient, OllamaConfig, OllamaEmbeddingClient};

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: Role,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: Role::System, content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }
}

/// A single prompt-completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
  pub messages: Vec<ChatMessage>,
  pub temperature: f32,
}

impl CompletionRequest {
  /// System prompt followed by the demand text as the user turn
  pub fn with_system(system: &str, user: &str, temperature: f32) -> Self {
    Self { messages: vec![ChatMessage::system(system), ChatMessage::user(user)], temperature }
  }
}

/// Issues one completion and returns the raw generated text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
  async fn complete(&self, request: CompletionRequest) -> Result<String, TransportError>;
}

/// Maps text to a fixed-length vector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
  async fn embed(&self, text: &str) -> Result<Vec<f32>, TransportError>;
}
