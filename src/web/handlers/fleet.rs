//! # Fleet Status and Command Handlers

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::DecodeError;
use crate::models::{CommandRequest, WorkerState};
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

/// Worker status map: GET /status
pub async fn get_status(
    State(state): State<AppState>,
) -> ApiResult<Json<HashMap<String, WorkerState>>> {
    let status = state
        .commander
        .status_with_deadline(state.request_timeout)
        .await?;
    Ok(Json(status))
}

/// Lifecycle command: POST /status
///
/// Body is `{"Target": "<worker>", "Command": "<command>"}`; success is an
/// empty 200.
pub async fn send_command(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<StatusCode> {
    let body = body.map_err(|e| ApiError::internal("read command body", &e))?;
    let request: CommandRequest = serde_json::from_slice(&body).map_err(DecodeError::from)?;

    state
        .commander
        .command_with_deadline(&request.target, &request.command, state.request_timeout)
        .await?;
    Ok(StatusCode::OK)
}
