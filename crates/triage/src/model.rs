//! Demand records, classification taxonomy and retrieval results

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum number of characters of stored content echoed back in a match
pub const MATCH_PREVIEW_CHARS: usize = 200;

/// Marker appended to previews that were cut short
pub const TRUNCATION_MARKER: &str = "...";

/// Kind of work a demand asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DemandType {
  #[serde(alias = "NewFeature", alias = "新功能开发")]
  NewFeature,
  #[serde(alias = "BugFix", alias = "Bug修复")]
  BugFix,
  #[serde(alias = "OpsSupport", alias = "运维支持")]
  OpsSupport,
  #[serde(alias = "Consultation", alias = "咨询")]
  Consultation,
  #[serde(alias = "DataRequest", alias = "数据需求")]
  DataRequest,
}

impl DemandType {
  pub const ALL: [DemandType; 5] = [
    DemandType::NewFeature,
    DemandType::BugFix,
    DemandType::OpsSupport,
    DemandType::Consultation,
    DemandType::DataRequest,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      DemandType::NewFeature => "new_feature",
      DemandType::BugFix => "bug_fix",
      DemandType::OpsSupport => "ops_support",
      DemandType::Consultation => "consultation",
      DemandType::DataRequest => "data_request",
    }
  }
}

/// How soon a demand needs attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
  #[serde(alias = "Urgent", alias = "紧急")]
  Urgent,
  #[serde(alias = "Normal", alias = "一般")]
  Normal,
  #[serde(alias = "Low", alias = "低")]
  Low,
}

impl Urgency {
  pub const ALL: [Urgency; 3] = [Urgency::Urgent, Urgency::Normal, Urgency::Low];

  pub fn as_str(&self) -> &'static str {
    match self {
      Urgency::Urgent => "urgent",
      Urgency::Normal => "normal",
      Urgency::Low => "low",
    }
  }
}

/// Validated classification of a single demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClassifyResult {
  #[serde(rename = "type")]
  pub demand_type: DemandType,
  pub urgency: Urgency,
  /// Department suggested to handle the demand
  pub department: String,
  /// One-sentence justification from the model
  pub reason: String,
}

/// Known metadata stored alongside a demand
///
/// Unknown keys are rejected so writers and readers cannot drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DemandMetadata {
  /// Always the id the demand was stored under
  #[serde(default)]
  pub demand_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub department: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub demand_type: Option<DemandType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub urgency: Option<Urgency>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub submitted_at: Option<DateTime<Utc>>,
}

/// A demand as handed to the retriever for storage
#[derive(Debug, Clone, PartialEq)]
pub struct DemandRecord {
  pub id: String,
  pub content: String,
  pub metadata: DemandMetadata,
}

impl DemandRecord {
  pub fn new(id: impl Into<String>, content: impl Into<String>, metadata: Option<DemandMetadata>) -> Self {
    let id = id.into();
    let mut metadata = metadata.unwrap_or_default();
    metadata.demand_id = id.clone();
    Self { id, content: content.into(), metadata }
  }
}

/// A previously stored demand close to a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimilarityMatch {
  pub demand_id: Option<String>,
  /// Stored content, cut to a short preview
  pub content: String,
  /// Cosine distance, lower is more similar
  pub score: f64,
}

impl SimilarityMatch {
  pub fn new(demand_id: Option<String>, content: &str, distance: f32) -> Self {
    Self { demand_id, content: preview(content), score: round_score(distance) }
  }
}

/// Collection-level counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IndexStats {
  pub total_documents: usize,
  pub collection_name: String,
}

/// Cut content to the preview length, counting characters rather than bytes
pub fn preview(content: &str) -> String {
  match content.char_indices().nth(MATCH_PREVIEW_CHARS) {
    Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &content[..cut]),
    None => content.to_string(),
  }
}

/// Round a distance to four decimal places
pub fn round_score(distance: f32) -> f64 {
  (f64::from(distance) * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_preview_keeps_short_content() {
    assert_eq!(preview("short demand"), "short demand");
  }

  #[test]
  fn test_preview_exactly_at_limit_is_untouched() {
    let content = "a".repeat(MATCH_PREVIEW_CHARS);
    assert_eq!(preview(&content), content);
  }

  #[test]
  fn test_preview_truncates_by_characters() {
    let content = "需".repeat(MATCH_PREVIEW_CHARS + 5);
    let cut = preview(&content);

    assert!(cut.ends_with(TRUNCATION_MARKER));
    assert_eq!(cut.chars().count(), MATCH_PREVIEW_CHARS + TRUNCATION_MARKER.len());
  }

  #[test]
  fn test_round_score_four_decimals() {
    assert_eq!(round_score(0.123456), 0.1235);
    assert_eq!(round_score(0.0), 0.0);
  }

  #[test]
  fn test_taxonomy_accepts_legacy_labels() {
    let demand_type: DemandType = serde_json::from_str("\"Bug修复\"").unwrap();
    let urgency: Urgency = serde_json::from_str("\"紧急\"").unwrap();

    assert_eq!(demand_type, DemandType::BugFix);
    assert_eq!(urgency, Urgency::Urgent);
  }

  #[test]
  fn test_taxonomy_rejects_unknown_labels() {
    assert!(serde_json::from_str::<DemandType>("\"refactor\"").is_err());
    assert!(serde_json::from_str::<Urgency>("\"whenever\"").is_err());
  }

  #[test]
  fn test_taxonomy_wire_names() {
    for demand_type in DemandType::ALL {
      let json = serde_json::to_string(&demand_type).unwrap();
      assert_eq!(json, format!("\"{}\"", demand_type.as_str()));
    }
    for urgency in Urgency::ALL {
      let json = serde_json::to_string(&urgency).unwrap();
      assert_eq!(json, format!("\"{}\"", urgency.as_str()));
    }
  }

  #[test]
  fn test_record_stamps_demand_id_into_metadata() {
    let metadata = DemandMetadata { source: Some("portal".to_string()), ..Default::default() };
    let record = DemandRecord::new("D7", "Need VPN access", Some(metadata));

    assert_eq!(record.metadata.demand_id, "D7");
    assert_eq!(record.metadata.source.as_deref(), Some("portal"));
  }

  #[test]
  fn test_metadata_rejects_unknown_keys() {
    let result = serde_json::from_str::<DemandMetadata>(r#"{"priority": "high"}"#);
    assert!(result.is_err());
  }
}
