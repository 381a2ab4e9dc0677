//! CSI RPC surface.
//!
//! Served as JSON over HTTP/1.1 on the daemon's unix-domain socket.
//! Endpoints are grouped by CSI service:
//! - `/v0/identity/*`: plugin metadata and readiness
//! - `/v0/node/*`: publish/unpublish volumes on this node
//! - `/v0/controller/*`: cluster-side volume validation
//! - `/_status/*`: liveness and build info for external health checks
//!
//! Each endpoint module owns its request/response types, its handler, and
//! its error-to-status mapping; [`client`] provides the matching caller
//! side used by the CLI.

pub mod client;
pub mod controller;
pub mod health;
pub mod identity;
pub mod node;

use axum::Router;

use crate::state::ServiceState;

pub fn router(state: ServiceState) -> Router {
    Router::new()
        .nest("/v0/identity", identity::router())
        .nest("/v0/node", node::router())
        .nest("/v0/controller", controller::router())
        .nest("/_status", health::router())
        .with_state(state)
}
