//! Short narrative summaries of demands

use std::sync::Arc;

use crate::error::TransportError;
use crate::llm::{CompletionClient, CompletionRequest};

/// Summaries are prose for people, so mild variation is fine
pub const SUMMARY_TEMPERATURE: f32 = 0.3;

pub const SUMMARY_SYSTEM_PROMPT: &str = r#"You are a senior requirements analyst. Summarise the key points of the demand concisely.

Output format (three sentences at most):
1. [Background] why the demand was raised
2. [Request] what specifically needs to be done
3. [Expected outcome] what result is expected

Keep it brief: no more than 30 words per point."#;

pub struct Summarizer {
  client: Arc<dyn CompletionClient>,
}

impl Summarizer {
  pub fn new(client: Arc<dyn CompletionClient>) -> Self {
    Self { client }
  }

  pub async fn summarize(&self, text: &str) -> Result<String, TransportError> {
    let request = CompletionRequest::with_system(SUMMARY_SYSTEM_PROMPT, text, SUMMARY_TEMPERATURE);

    match self.client.complete(request).await {
      Ok(summary) => Ok(summary.trim().to_string()),
      Err(e) => {
        tracing::error!("summary backend failed: {e}");
        Err(e)
      }
    }
  }
}
