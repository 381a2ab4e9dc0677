//! Liveness and build-info endpoints for external health checks.

pub mod liveness;
pub mod version;

use axum::routing::get;
use axum::Router;

use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/livez", get(liveness::handler))
        .route("/version", get(version::handler))
}
