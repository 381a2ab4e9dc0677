//! CSI Controller service: cluster-side volume validation.
//!
//! This driver only does static provisioning: `create_volume` verifies
//! that the named bucket already exists and hands its name back as the
//! volume id. Bucket lifecycle stays with whoever owns the bucket.

pub mod capabilities;
pub mod create_volume;

use axum::routing::post;
use axum::Router;

use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/create_volume", post(create_volume::handler))
        .route("/capabilities", post(capabilities::handler))
}
