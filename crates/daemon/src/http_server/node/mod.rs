//! CSI Node service: volume publish/unpublish on this node.

pub mod capabilities;
pub mod info;
pub mod publish;
pub mod unpublish;

use axum::routing::post;
use axum::Router;

use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/publish_volume", post(publish::handler))
        .route("/unpublish_volume", post(unpublish::handler))
        .route("/info", post(info::handler))
        .route("/capabilities", post(capabilities::handler))
}
