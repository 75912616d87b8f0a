//! Request context middleware for the triage REST API
//!
//! Every request gets a unique id, a start/completion log line and a
//! [`RequestContext`] extension that handlers use to tag their own logs.

use axum::{
  extract::Request,
  http::{Method, Uri},
  middleware::Next,
  response::Response,
};
use std::time::Instant;
use uuid::Uuid;

/// Request metadata shared with handlers
#[derive(Debug, Clone)]
pub struct RequestContext {
  /// Unique ID for this request
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
  /// Value of the User-Agent header, if any
  pub user_agent: Option<String>,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri, user_agent: Option<String>) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri, user_agent }
  }

  pub fn log_info(&self, message: &str, component: &str) {
    tracing::info!(request_id = %self.request_id, component, "{message}");
  }

  pub fn log_warn(&self, message: &str, component: &str) {
    tracing::warn!(request_id = %self.request_id, component, "{message}");
  }

  pub fn log_error(&self, message: &str, component: &str) {
    tracing::error!(request_id = %self.request_id, component, "{message}");
  }

  fn log_request_start(&self) {
    tracing::info!(
      request_id = %self.request_id,
      method = %self.method,
      path = self.uri.path(),
      user_agent = self.user_agent.as_deref().unwrap_or("none"),
      "request started"
    );
  }

  fn log_request_complete(&self, status_code: u16, duration_ms: f64) {
    tracing::info!(
      request_id = %self.request_id,
      method = %self.method,
      path = self.uri.path(),
      status_code,
      duration_ms,
      "request completed"
    );
  }
}

/// Middleware to inject RequestContext into all requests
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
  let user_agent = request
    .headers()
    .get("user-agent")
    .and_then(|v| v.to_str().ok())
    .map(str::to_string);
  let context = RequestContext::new(request.method().clone(), request.uri().clone(), user_agent);

  let start_time = Instant::now();
  context.log_request_start();
  request.extensions_mut().insert(context.clone());

  let response = next.run(request).await;

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  context.log_request_complete(response.status().as_u16(), duration_ms);

  response
}
