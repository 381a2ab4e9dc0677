//! CSI Identity service: plugin metadata and readiness.

pub mod capabilities;
pub mod plugin_info;
pub mod probe;

pub use plugin_info::{DRIVER_NAME, DRIVER_REPO};

use axum::routing::post;
use axum::Router;

use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/plugin_info", post(plugin_info::handler))
        .route("/capabilities", post(capabilities::handler))
        .route("/probe", post(probe::handler))
}
