//! Structured output extraction from free-form completion text
//!
//! Models do not reliably honour "JSON only": answers arrive fenced in
//! markdown, tagged with a language, or wrapped in a sentence of prose. The
//! parser strips those wrappers, decodes one JSON object and validates it
//! against [`ClassifyResult`]. It never panics; every failure comes back as a
//! [`ParseError`] carrying the untouched completion.

use serde_json::Value;

use crate::error::ParseError;
use crate::model::ClassifyResult;

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Extract a classification from raw completion text
pub fn parse(raw: &str) -> Result<ClassifyResult, ParseError> {
  let body = unwrap_fence(raw.trim());
  let object = decode_object(body).or_else(|err| match embedded_object(body) {
    Some(span) if span.len() < body.len() => decode_object(span),
    _ => Err(err),
  });

  let object = object.map_err(|message| ParseError::new(message, raw))?;
  validate(object).map_err(|message| ParseError::new(message, raw))
}

/// Return the contents of the first fenced block, minus an optional `json` tag
fn unwrap_fence(text: &str) -> &str {
  let Some(after_open) = text.strip_prefix(FENCE) else {
    return text;
  };

  let block = match after_open.find(FENCE) {
    Some(end) => &after_open[..end],
    None => after_open,
  };

  block.strip_prefix(JSON_TAG).unwrap_or(block).trim()
}

/// Span from the first `{` to the last `}`, if there is one
fn embedded_object(text: &str) -> Option<&str> {
  let start = text.find('{')?;
  let end = text.rfind('}')?;
  (end > start).then(|| &text[start..=end])
}

fn decode_object(text: &str) -> Result<Value, String> {
  let value: Value =
    serde_json::from_str(text).map_err(|e| format!("classification output is not valid JSON: {e}"))?;

  if value.is_object() {
    Ok(value)
  } else {
    Err("classification output is not a JSON object".to_string())
  }
}

fn validate(object: Value) -> Result<ClassifyResult, String> {
  serde_json::from_value(object)
    .map_err(|e| format!("classification output does not match the expected schema: {e}"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{DemandType, Urgency};

  const BODY: &str = r#"{
    "type": "bug_fix",
    "urgency": "urgent",
    "department": "Core Banking",
    "reason": "Login failures block customer transactions"
  }"#;

  fn expected() -> ClassifyResult {
    ClassifyResult {
      demand_type: DemandType::BugFix,
      urgency: Urgency::Urgent,
      department: "Core Banking".to_string(),
      reason: "Login failures block customer transactions".to_string(),
    }
  }

  #[test]
  fn test_parse_bare_json() {
    assert_eq!(parse(BODY).unwrap(), expected());
  }

  #[test]
  fn test_parse_json_tagged_fence_matches_bare_body() {
    let fenced = format!("```json\n{BODY}\n```");
    assert_eq!(parse(&fenced).unwrap(), parse(BODY).unwrap());
  }

  #[test]
  fn test_parse_untagged_fence() {
    let fenced = format!("```\n{BODY}\n```");
    assert_eq!(parse(&fenced).unwrap(), expected());
  }

  #[test]
  fn test_parse_unclosed_fence() {
    let fenced = format!("```json\n{BODY}");
    assert_eq!(parse(&fenced).unwrap(), expected());
  }

  #[test]
  fn test_parse_tolerates_surrounding_whitespace() {
    let padded = format!("\n\n   {BODY}   \n\t");
    assert_eq!(parse(&padded).unwrap(), expected());
  }

  #[test]
  fn test_parse_prose_wrapped_object() {
    let wrapped = format!("Here is the classification you asked for:\n{BODY}\nLet me know!");
    assert_eq!(parse(&wrapped).unwrap(), expected());
  }

  #[test]
  fn test_parse_legacy_labels() {
    let raw = r#"{"type": "数据需求", "urgency": "一般", "department": "数据中心", "reason": "需要导出报表"}"#;
    let result = parse(raw).unwrap();

    assert_eq!(result.demand_type, DemandType::DataRequest);
    assert_eq!(result.urgency, Urgency::Normal);
  }

  #[test]
  fn test_truncated_json_keeps_raw_text() {
    let raw = r#"```json
{"type": "bug_fix", "urgency": "urg"#;
    let err = parse(raw).unwrap_err();

    assert_eq!(err.raw_text, raw);
    assert!(err.message.contains("not valid JSON"));
  }

  #[test]
  fn test_missing_field_is_schema_violation() {
    let raw = r#"{"type": "bug_fix", "urgency": "low", "department": "IT"}"#;
    let err = parse(raw).unwrap_err();

    assert!(err.message.contains("schema"));
    assert_eq!(err.raw_text, raw);
  }

  #[test]
  fn test_wrong_field_type_is_schema_violation() {
    let raw = r#"{"type": "bug_fix", "urgency": "low", "department": 42, "reason": "x"}"#;
    assert!(parse(raw).unwrap_err().message.contains("schema"));
  }

  #[test]
  fn test_value_outside_taxonomy_is_rejected() {
    let raw = r#"{"type": "refactoring", "urgency": "low", "department": "IT", "reason": "x"}"#;
    assert!(parse(raw).is_err());

    let raw = r#"{"type": "bug_fix", "urgency": "critical", "department": "IT", "reason": "x"}"#;
    assert!(parse(raw).is_err());
  }

  #[test]
  fn test_non_object_json_is_rejected() {
    let err = parse("[1, 2, 3]").unwrap_err();
    assert!(err.message.contains("not a JSON object"));
  }

  #[test]
  fn test_empty_input_is_parse_error() {
    let err = parse("   ").unwrap_err();
    assert_eq!(err.raw_text, "   ");
  }
}
