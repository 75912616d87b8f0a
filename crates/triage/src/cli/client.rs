//! HTTP client for the triage REST API

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use crate::model::DemandMetadata;
use crate::server::types::{
  ClassifyResponse, DemandRequest, HealthResponse, SimilarResponse, StatsResponse, StoreResponse,
  SummaryResponse,
};

/// Configuration for the triage HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the triage server (e.g., "http://localhost:9000")
  pub base_url: String,
  /// Request timeout in seconds; classification can take a while on CPU-only backends
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: "http://localhost:9000".to_string(), timeout_secs: 150 }
  }
}

/// HTTP client for the triage REST API
pub struct TriageClient {
  client: Client,
  config: ClientConfig,
}

impl TriageClient {
  pub fn with_config(config: ClientConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| anyhow!("Failed to create HTTP client: {e}"))?;

    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str {
    &self.config.base_url
  }

  pub async fn classify(&self, content: &str) -> Result<ClassifyResponse> {
    self.post("classify", &content_request(content)).await
  }

  pub async fn summarize(&self, content: &str) -> Result<SummaryResponse> {
    self.post("summarize", &content_request(content)).await
  }

  pub async fn find_similar(&self, content: &str, k: usize) -> Result<SimilarResponse> {
    let request = DemandRequest { k: Some(k), ..content_request(content) };
    self.post("similar", &request).await
  }

  pub async fn store(
    &self,
    demand_id: &str,
    content: &str,
    metadata: Option<DemandMetadata>,
  ) -> Result<StoreResponse> {
    let request =
      DemandRequest { demand_id: Some(demand_id.to_string()), metadata, ..content_request(content) };
    self.post("store", &request).await
  }

  pub async fn stats(&self) -> Result<StatsResponse> {
    self.get("stats").await
  }

  pub async fn health(&self) -> Result<HealthResponse> {
    self.get("health").await
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
  }

  async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
    let response = self
      .client
      .post(self.url(path))
      .json(body)
      .send()
      .await
      .map_err(|e| anyhow!("Could not reach triage server at {}: {e}", self.config.base_url))?;
    decode(path, response).await
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let response = self
      .client
      .get(self.url(path))
      .send()
      .await
      .map_err(|e| anyhow!("Could not reach triage server at {}: {e}", self.config.base_url))?;
    decode(path, response).await
  }
}

fn content_request(content: &str) -> DemandRequest {
  DemandRequest { content: content.to_string(), ..Default::default() }
}

async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
  let status = response.status();
  let text = response.text().await?;

  if status.is_success() {
    return serde_json::from_str(&text).map_err(|e| anyhow!("Invalid response from /{path}: {e}"));
  }

  Err(anyhow!("/{path} failed ({status}): {}", failure_message(&text)))
}

/// Pull the human-readable message out of a failure body
fn failure_message(body: &str) -> String {
  serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|value| {
      value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
    })
    .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_failure_message_prefers_error_field() {
    assert_eq!(failure_message(r#"{"success":false,"error":"content must not be empty"}"#), "content must not be empty");
    assert_eq!(failure_message(r#"{"success":false,"message":"demand_id is required"}"#), "demand_id is required");
    assert_eq!(failure_message("plain text"), "plain text");
  }

  #[test]
  fn test_url_joins_paths() {
    let client = TriageClient::with_config(ClientConfig {
      base_url: "http://triage:9000/".to_string(),
      timeout_secs: 5,
    })
    .unwrap();
    assert_eq!(client.url("store"), "http://triage:9000/store");
  }
}
