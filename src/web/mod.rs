//! # Web API Module
//!
//! Axum HTTP surface of the control plane.
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /tasks` | submit a scan task |
//! | `GET /status` | worker status map |
//! | `POST /status` | send a lifecycle command to a worker |
//! | `GET /ips`, `GET /ips/{ip}` | filtered scan results |
//! | `GET /health` | liveness |

pub mod extractors;
pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use response_types::{ApiError, ApiResult};
pub use state::AppState;

/// Create the Axum application with all routes and request tracing
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .merge(routes::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
