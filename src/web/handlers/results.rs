//! # Scan Result Handlers

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::models::{Banner, FilterCriteria};
use crate::web::extractors::FilterParams;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

/// Filtered results across all addresses: GET /ips
pub async fn query_results(
    State(state): State<AppState>,
    params: FilterParams,
) -> ApiResult<Json<Vec<Banner>>> {
    run_query(&state, params.into_criteria(None)).await
}

/// Filtered results for one address: GET /ips/{ip}
///
/// A segment that does not decode to UTF-8 fails like any other result
/// query, with the generic 500 body.
pub async fn query_results_for_ip(
    State(state): State<AppState>,
    ip: Result<Path<String>, PathRejection>,
    params: FilterParams,
) -> ApiResult<Json<Vec<Banner>>> {
    let Path(ip) = ip.map_err(|e| ApiError::internal("decode ip segment", &e))?;
    run_query(&state, params.into_criteria(Some(&ip))).await
}

async fn run_query(state: &AppState, criteria: FilterCriteria) -> ApiResult<Json<Vec<Banner>>> {
    let banners = state
        .repository
        .query_with_deadline(&criteria, state.request_timeout)
        .await?;
    Ok(Json(banners))
}
