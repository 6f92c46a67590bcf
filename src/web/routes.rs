//! # Web API Route Definitions

use axum::routing::get;
use axum::Router;

use crate::constants::RESULTS_PATH;
use crate::web::handlers;
use crate::web::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", axum::routing::post(handlers::tasks::submit_task))
        .route(
            "/status",
            get(handlers::fleet::get_status).post(handlers::fleet::send_command),
        )
        .route(RESULTS_PATH, get(handlers::results::query_results))
        .route(
            &format!("{RESULTS_PATH}/{{ip}}"),
            get(handlers::results::query_results_for_ip),
        )
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::basic_health))
}
