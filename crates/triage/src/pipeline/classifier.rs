//! Demand classification against the fixed type and urgency taxonomy

use std::sync::Arc;

use super::parser;
use crate::error::ClassifyError;
use crate::llm::{CompletionClient, CompletionRequest};
use crate::model::ClassifyResult;

/// Classification must be reproducible for the same input
pub const CLASSIFY_TEMPERATURE: f32 = 0.0;

pub const CLASSIFY_SYSTEM_PROMPT: &str = r#"You are an IT demand classification specialist serving the technology department of a financial institution.

Analyse the demand submitted by the user and return the classification as JSON:
{
  "type": "new_feature|bug_fix|ops_support|consultation|data_request",
  "urgency": "urgent|normal|low",
  "department": "name of the department that should handle it",
  "reason": "one sentence explaining the classification"
}

Type rules:
- new_feature: new functionality, feature improvements, interface changes
- bug_fix: system errors, malfunctioning features, incorrect data
- ops_support: access requests, environment configuration, system maintenance
- consultation: usage questions, solution advice, technical advice
- data_request: data exports, report development, data corrections

Urgency rules:
- urgent: affects core business, involves funds security, or is a regulatory requirement
- normal: has a clear deadline but is not critical, or affects some users
- low: optimisation requests with no clear time requirement

Return only the JSON object, nothing else."#;

/// Turns demand text into a validated [`ClassifyResult`]
pub struct Classifier {
  client: Arc<dyn CompletionClient>,
}

impl Classifier {
  pub fn new(client: Arc<dyn CompletionClient>) -> Self {
    Self { client }
  }

  pub async fn classify(&self, text: &str) -> Result<ClassifyResult, ClassifyError> {
    let request = CompletionRequest::with_system(CLASSIFY_SYSTEM_PROMPT, text, CLASSIFY_TEMPERATURE);

    let raw = self.client.complete(request).await.map_err(|e| {
      tracing::error!("classification backend failed: {e}");
      e
    })?;

    parser::parse(&raw).map_err(|e| {
      tracing::warn!(raw_len = raw.len(), "failed to parse classification output: {}", e.message);
      ClassifyError::Parse(e)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::TransportError;
  use crate::llm::{MockCompletionClient, Role};
  use crate::model::{DemandType, Urgency};

  fn classifier_returning(answer: Result<String, TransportError>) -> Classifier {
    let mut client = MockCompletionClient::new();
    let mut answer = Some(answer);
    client
      .expect_complete()
      .times(1)
      .returning(move |_| answer.take().unwrap_or_else(|| Ok(String::new())));
    Classifier::new(Arc::new(client))
  }

  #[tokio::test]
  async fn test_classify_sends_prompt_at_zero_temperature() {
    let mut client = MockCompletionClient::new();
    client
      .expect_complete()
      .withf(|request| {
        request.temperature == CLASSIFY_TEMPERATURE
          && request.messages.len() == 2
          && request.messages[0].role == Role::System
          && request.messages[0].content == CLASSIFY_SYSTEM_PROMPT
          && request.messages[1].content == "Need read access to the CRM database"
      })
      .times(1)
      .returning(|_| {
        Ok(r#"{"type":"ops_support","urgency":"normal","department":"IT Ops","reason":"Access request"}"#.to_string())
      });

    let classifier = Classifier::new(Arc::new(client));
    let result = classifier.classify("Need read access to the CRM database").await.unwrap();

    assert_eq!(result.demand_type, DemandType::OpsSupport);
    assert_eq!(result.urgency, Urgency::Normal);
  }

  #[tokio::test]
  async fn test_classify_fenced_answer() {
    let classifier = classifier_returning(Ok(
      "```json\n{\"type\":\"bug_fix\",\"urgency\":\"urgent\",\"department\":\"Payments\",\"reason\":\"Transfers fail\"}\n```"
        .to_string(),
    ));

    let result = classifier.classify("Transfers fail with error 500").await.unwrap();
    assert_eq!(result.demand_type, DemandType::BugFix);
    assert_eq!(result.department, "Payments");
  }

  #[tokio::test]
  async fn test_classify_bad_answer_is_parse_error_with_raw() {
    let classifier = classifier_returning(Ok("I think this is a bug fix.".to_string()));

    match classifier.classify("Transfers fail").await {
      Err(ClassifyError::Parse(e)) => assert_eq!(e.raw_text, "I think this is a bug fix."),
      other => panic!("expected parse error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_classify_transport_failure_is_distinct() {
    let classifier = classifier_returning(Err(TransportError::Timeout {
      endpoint: "http://ollama/api/chat".to_string(),
      timeout_secs: 120,
    }));

    let result = classifier.classify("Transfers fail").await;
    assert!(matches!(result, Err(ClassifyError::Transport(TransportError::Timeout { .. }))));
  }

  #[test]
  fn test_prompt_lists_full_taxonomy() {
    for demand_type in DemandType::ALL {
      assert!(CLASSIFY_SYSTEM_PROMPT.contains(demand_type.as_str()));
    }
    for urgency in Urgency::ALL {
      assert!(CLASSIFY_SYSTEM_PROMPT.contains(urgency.as_str()));
    }
  }
}
