//! Node capabilities endpoint

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http_server::client::ApiRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeCapabilitiesRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeCapabilitiesResponse {
    pub capabilities: Vec<String>,
}

impl ApiRequest for NodeCapabilitiesRequest {
    type Response = NodeCapabilitiesResponse;

    fn path(&self) -> String {
        "/v0/node/capabilities".to_string()
    }
}

/// No optional node capabilities: publish works straight from the request
/// without a separate staging step.
#[tracing::instrument]
pub async fn handler() -> Response {
    (
        StatusCode::OK,
        Json(NodeCapabilitiesResponse {
            capabilities: Vec::new(),
        }),
    )
        .into_response()
}
