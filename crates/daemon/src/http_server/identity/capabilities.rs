//! Plugin capabilities endpoint

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http_server::client::ApiRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginCapabilitiesRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginCapabilitiesResponse {
    pub capabilities: Vec<String>,
}

impl ApiRequest for PluginCapabilitiesRequest {
    type Response = PluginCapabilitiesResponse;

    fn path(&self) -> String {
        "/v0/identity/capabilities".to_string()
    }
}

/// The driver ships a Controller service, so that capability is the one
/// non-default thing to advertise.
#[tracing::instrument]
pub async fn handler() -> Response {
    (
        StatusCode::OK,
        Json(PluginCapabilitiesResponse {
            capabilities: vec!["CONTROLLER_SERVICE".to_string()],
        }),
    )
        .into_response()
}
