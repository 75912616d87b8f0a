//! HTTP clients for an Ollama-compatible backend
//!
//! `POST /api/chat` for completions and `POST /api/embed` for embeddings,
//! both non-streaming with a bounded request timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ChatMessage, CompletionClient, CompletionRequest, EmbeddingClient};
use crate::error::TransportError;

/// Connection settings shared by both clients
#[derive(Debug, Clone)]
pub struct OllamaConfig {
  /// Base URL of the backend (e.g., "http://localhost:11434")
  pub base_url: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for OllamaConfig {
  fn default() -> Self {
    Self { base_url: "http://localhost:11434".to_string(), timeout_secs: 120 }
  }
}

impl OllamaConfig {
  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.trim_end_matches('/'), path)
  }

  fn build_http_client(&self) -> Result<Client, TransportError> {
    Client::builder()
      .timeout(Duration::from_secs(self.timeout_secs))
      .build()
      .map_err(|e| TransportError::Protocol(format!("failed to create HTTP client: {e}")))
  }
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
  model: &'a str,
  messages: &'a [ChatMessage],
  stream: bool,
  options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
  temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponseBody {
  message: ChatMessage,
}

#[derive(Serialize)]
struct EmbedRequestBody<'a> {
  model: &'a str,
  input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponseBody {
  embeddings: Vec<Vec<f32>>,
}

/// Chat completion client
pub struct OllamaCompletionClient {
  client: Client,
  config: OllamaConfig,
  model: String,
}

impl OllamaCompletionClient {
  pub fn new(config: OllamaConfig, model: impl Into<String>) -> Result<Self, TransportError> {
    let client = config.build_http_client()?;
    Ok(Self { client, config, model: model.into() })
  }
}

#[async_trait]
impl CompletionClient for OllamaCompletionClient {
  async fn complete(&self, request: CompletionRequest) -> Result<String, TransportError> {
    let url = self.config.endpoint("api/chat");
    let body = ChatRequestBody {
      model: &self.model,
      messages: &request.messages,
      stream: false,
      options: ChatOptions { temperature: request.temperature },
    };

    tracing::debug!(model = %self.model, temperature = request.temperature, "sending completion request");
    let response: ChatResponseBody = post_json(&self.client, &self.config, &url, &body).await?;
    Ok(response.message.content)
  }
}

/// Embedding client
pub struct OllamaEmbeddingClient {
  client: Client,
  config: OllamaConfig,
  model: String,
}

impl OllamaEmbeddingClient {
  pub fn new(config: OllamaConfig, model: impl Into<String>) -> Result<Self, TransportError> {
    let client = config.build_http_client()?;
    Ok(Self { client, config, model: model.into() })
  }
}

#[async_trait]
impl EmbeddingClient for OllamaEmbeddingClient {
  async fn embed(&self, text: &str) -> Result<Vec<f32>, TransportError> {
    let url = self.config.endpoint("api/embed");
    let body = EmbedRequestBody { model: &self.model, input: text };

    let response: EmbedResponseBody = post_json(&self.client, &self.config, &url, &body).await?;
    first_embedding(response)
  }
}

fn first_embedding(response: EmbedResponseBody) -> Result<Vec<f32>, TransportError> {
  match response.embeddings.into_iter().next() {
    Some(embedding) if !embedding.is_empty() => Ok(embedding),
    _ => Err(TransportError::Protocol("embedding response contained no vector".to_string())),
  }
}

/// POST a JSON body and decode a JSON answer, mapping every failure to a transport error
async fn post_json<B, R>(
  client: &Client,
  config: &OllamaConfig,
  url: &str,
  body: &B,
) -> Result<R, TransportError>
where
  B: Serialize + ?Sized,
  R: for<'de> Deserialize<'de>,
{
  let response = client
    .post(url)
    .json(body)
    .send()
    .await
    .map_err(|e| TransportError::from_reqwest(url, config.timeout_secs, e))?;

  let status = response.status();
  if !status.is_success() {
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%url, status = status.as_u16(), "backend returned an error status");
    return Err(TransportError::Status { status: status.as_u16(), body });
  }

  response.json::<R>().await.map_err(|e| {
    if e.is_timeout() {
      TransportError::Timeout { endpoint: url.to_string(), timeout_secs: config.timeout_secs }
    } else {
      TransportError::Protocol(e.to_string())
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_joins_without_double_slash() {
    let config =
      OllamaConfig { base_url: "http://ollama:11434/".to_string(), ..Default::default() };
    assert_eq!(config.endpoint("api/chat"), "http://ollama:11434/api/chat");
  }

  #[test]
  fn test_chat_body_shape() {
    let messages = vec![ChatMessage::system("rules"), ChatMessage::user("demand")];
    let body = ChatRequestBody {
      model: "qwen2.5:7b",
      messages: &messages,
      stream: false,
      options: ChatOptions { temperature: 0.0 },
    };

    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["model"], "qwen2.5:7b");
    assert_eq!(json["stream"], false);
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][1]["content"], "demand");
    assert_eq!(json["options"]["temperature"], 0.0);
  }

  #[test]
  fn test_first_embedding_rejects_empty_response() {
    let result = first_embedding(EmbedResponseBody { embeddings: vec![] });
    assert!(matches!(result, Err(TransportError::Protocol(_))));

    let result = first_embedding(EmbedResponseBody { embeddings: vec![vec![]] });
    assert!(matches!(result, Err(TransportError::Protocol(_))));
  }

  #[test]
  fn test_first_embedding_takes_first_vector() {
    let result = first_embedding(EmbedResponseBody { embeddings: vec![vec![0.5, 0.25], vec![1.0]] });
    assert_eq!(result.unwrap(), vec![0.5, 0.25]);
  }

  #[tokio::test]
  async fn test_unreachable_backend_is_transport_error() {
    // Port 9 (discard) is not expected to host an HTTP server
    let config = OllamaConfig { base_url: "http://127.0.0.1:9".to_string(), timeout_secs: 2 };
    let client = OllamaEmbeddingClient::new(config, "nomic-embed-text").unwrap();

    let result = client.embed("hello").await;
    assert!(matches!(
      result,
      Err(TransportError::Unreachable { .. }) | Err(TransportError::Timeout { .. })
    ));
  }
}
