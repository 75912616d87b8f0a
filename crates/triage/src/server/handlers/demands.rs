//! Demand endpoint handlers

use axum::{
  extract::{rejection::JsonRejection, Extension, Json, State},
  http::StatusCode,
  response::Json as ResponseJson,
};

use crate::error::{ClassifyError, StorageError, ValidationError};
use crate::pipeline::DEFAULT_SIMILAR_LIMIT;
use crate::server::{
  middleware::RequestContext,
  state::AppState,
  types::{
    ClassifyResponse, DemandRequest, FailureBody, SimilarResponse, StoreResponse, SummaryResponse,
  },
};

/// Upper bound on `k` for /similar
pub const MAX_SIMILAR_LIMIT: usize = 50;

type HandlerResult<T> = Result<ResponseJson<T>, (StatusCode, ResponseJson<T>)>;

fn reject<T: FailureBody>(status: StatusCode, message: String) -> (StatusCode, ResponseJson<T>) {
  (status, ResponseJson(T::failure(message)))
}

/// Unreadable bodies get the operation's failure shape instead of axum's plain-text rejection
fn accept<T: FailureBody>(
  payload: Result<Json<DemandRequest>, JsonRejection>,
) -> Result<DemandRequest, (StatusCode, ResponseJson<T>)> {
  payload.map(|Json(request)| request).map_err(|e| reject(StatusCode::BAD_REQUEST, e.body_text()))
}

fn require_content(request: &DemandRequest) -> Result<(), ValidationError> {
  if request.content.trim().is_empty() {
    return Err(ValidationError::EmptyContent);
  }
  Ok(())
}

fn require_demand_id(request: &DemandRequest) -> Result<&str, ValidationError> {
  match request.demand_id.as_deref().map(str::trim) {
    Some(id) if !id.is_empty() => Ok(id),
    _ => Err(ValidationError::MissingDemandId),
  }
}

fn storage_status(err: &StorageError) -> StatusCode {
  match err {
    StorageError::MissingId | StorageError::EmptyContent => StatusCode::BAD_REQUEST,
    StorageError::Embedding(_) => StatusCode::BAD_GATEWAY,
    _ => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

/// POST /classify - Classify a demand into the type and urgency taxonomy
pub async fn classify(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  payload: Result<Json<DemandRequest>, JsonRejection>,
) -> HandlerResult<ClassifyResponse> {
  let request = accept::<ClassifyResponse>(payload)?;
  require_content(&request).map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;

  match state.classifier.classify(&request.content).await {
    Ok(result) => {
      context.log_info(
        &format!("classified as {}/{}", result.demand_type.as_str(), result.urgency.as_str()),
        "classify",
      );
      Ok(ResponseJson(ClassifyResponse { success: true, data: Some(result), error: None, raw: None }))
    }
    // Degraded success: keep the model output for a human to look at
    Err(ClassifyError::Parse(e)) => {
      context.log_warn(&format!("classification output unusable: {}", e.message), "classify");
      Ok(ResponseJson(ClassifyResponse {
        success: false,
        data: None,
        error: Some(e.message),
        raw: Some(e.raw_text),
      }))
    }
    Err(ClassifyError::Transport(e)) => {
      context.log_error(&format!("classification failed: {e}"), "classify");
      Err(reject(StatusCode::BAD_GATEWAY, e.to_string()))
    }
  }
}

/// POST /summarize - Produce a short narrative summary
pub async fn summarize(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  payload: Result<Json<DemandRequest>, JsonRejection>,
) -> HandlerResult<SummaryResponse> {
  let request = accept::<SummaryResponse>(payload)?;
  require_content(&request).map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;

  match state.summarizer.summarize(&request.content).await {
    Ok(summary) => Ok(ResponseJson(SummaryResponse { success: true, summary: Some(summary), error: None })),
    Err(e) => {
      context.log_error(&format!("summary failed: {e}"), "summarize");
      Err(reject(StatusCode::BAD_GATEWAY, e.to_string()))
    }
  }
}

/// POST /similar - Find stored demands close to the given text
pub async fn find_similar(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  payload: Result<Json<DemandRequest>, JsonRejection>,
) -> HandlerResult<SimilarResponse> {
  let request = accept::<SimilarResponse>(payload)?;
  require_content(&request).map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;
  let k = request.k.unwrap_or(DEFAULT_SIMILAR_LIMIT).clamp(1, MAX_SIMILAR_LIMIT);

  match state.retriever.find_similar(&request.content, k).await {
    Ok(similar_demands) => {
      context.log_info(&format!("found {} similar demands", similar_demands.len()), "similar");
      Ok(ResponseJson(SimilarResponse { success: true, similar_demands, error: None }))
    }
    Err(e) => {
      context.log_error(&format!("similarity search failed: {e}"), "similar");
      Err(reject(storage_status(&e), e.to_string()))
    }
  }
}

/// POST /store - Embed and persist a demand under its id
pub async fn store(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  payload: Result<Json<DemandRequest>, JsonRejection>,
) -> HandlerResult<StoreResponse> {
  let request = accept::<StoreResponse>(payload)?;
  require_content(&request).map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;
  let demand_id = require_demand_id(&request).map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;

  match state.retriever.add_demand(demand_id, &request.content, request.metadata.clone()).await {
    Ok(()) => {
      context.log_info(&format!("stored demand {demand_id}"), "store");
      Ok(ResponseJson(StoreResponse { success: true, message: format!("demand {demand_id} stored") }))
    }
    Err(e) => {
      context.log_error(&format!("failed to store demand {demand_id}: {e}"), "store");
      Err(reject(storage_status(&e), e.to_string()))
    }
  }
}
