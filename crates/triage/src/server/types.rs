//! REST API types with schemars annotations for OpenAPI generation
//!
//! Field names here are the wire contract.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{ClassifyResult, DemandMetadata, IndexStats, SimilarityMatch};

pub const SERVICE_NAME: &str = "demand-ai";

// Requests
// ========

/// Body accepted by every demand endpoint
///
/// Required fields are validated by the handlers so a missing value becomes a
/// 400 with the operation's own response shape.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct DemandRequest {
  /// Demand text
  #[serde(default)]
  pub content: String,

  /// Id to store the demand under (required by /store)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub demand_id: Option<String>,

  /// Known metadata to store with the demand (/store only)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata: Option<DemandMetadata>,

  /// Maximum number of similar demands (/similar only)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub k: Option<usize>,
}

// Responses
// =========

/// Response for /classify
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ClassifyResponse {
  pub success: bool,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<ClassifyResult>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,

  /// Model output that failed to parse, kept for a human reviewer
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub raw: Option<String>,
}

/// Response for /summarize
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SummaryResponse {
  pub success: bool,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Response for /similar
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SimilarResponse {
  pub success: bool,

  #[serde(default)]
  pub similar_demands: Vec<SimilarityMatch>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Response for /store
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StoreResponse {
  pub success: bool,
  pub message: String,
}

/// Vector index section of /stats
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum VectorDbStats {
  Available(IndexStats),
  Unavailable { error: String },
}

/// Response for /stats
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatsResponse {
  pub vector_db: Option<VectorDbStats>,
  pub model: String,
}

/// Response for /health
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
  pub status: String,
  pub service: String,
}

/// Responses that can describe a failed operation
pub trait FailureBody {
  fn failure(message: String) -> Self;
}

impl FailureBody for ClassifyResponse {
  fn failure(message: String) -> Self {
    Self { success: false, data: None, error: Some(message), raw: None }
  }
}

impl FailureBody for SummaryResponse {
  fn failure(message: String) -> Self {
    Self { success: false, summary: None, error: Some(message) }
  }
}

impl FailureBody for SimilarResponse {
  fn failure(message: String) -> Self {
    Self { success: false, similar_demands: Vec::new(), error: Some(message) }
  }
}

impl FailureBody for StoreResponse {
  fn failure(message: String) -> Self {
    Self { success: false, message }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_absent_fields_are_omitted() {
    let json = serde_json::to_value(SummaryResponse::failure("backend down".to_string())).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "backend down");
    assert!(json.get("summary").is_none());
  }

  #[test]
  fn test_vector_db_stats_shapes() {
    let available = VectorDbStats::Available(IndexStats {
      total_documents: 4,
      collection_name: "demands".to_string(),
    });
    let json = serde_json::to_value(available).unwrap();
    assert_eq!(json["total_documents"], 4);
    assert_eq!(json["collection_name"], "demands");

    let unavailable = VectorDbStats::Unavailable { error: "disk gone".to_string() };
    let json = serde_json::to_value(unavailable).unwrap();
    assert_eq!(json["error"], "disk gone");
  }

  #[test]
  fn test_request_defaults_missing_fields() {
    let request: DemandRequest = serde_json::from_str("{}").unwrap();
    assert!(request.content.is_empty());
    assert!(request.demand_id.is_none());
    assert!(request.k.is_none());
  }
}
