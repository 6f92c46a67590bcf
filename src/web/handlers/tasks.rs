//! # Task Submission Handler

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use tracing::debug;

use crate::models::ScanTask;
use crate::web::response_types::{ApiError, ApiResult, StatusResponse};
use crate::web::state::AppState;

/// Submit a scan task: POST /tasks
///
/// Any JSON object is accepted and forwarded to the worker pool. The response
/// is sent as soon as dispatch has started; the outcome of the RPC call is
/// only visible in the logs.
pub async fn submit_task(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let body = body.map_err(|e| ApiError::internal("read task body", &e))?;
    let task = ScanTask::from_slice(&body)?;

    let receipt = state.dispatcher.submit(task);
    debug!(dispatch_id = %receipt.dispatch_id, "Task submission accepted");

    Ok(Json(StatusResponse::success()))
}
