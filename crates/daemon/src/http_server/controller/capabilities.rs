//! Controller capabilities endpoint

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http_server::client::ApiRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerCapabilitiesRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerCapabilitiesResponse {
    pub capabilities: Vec<String>,
}

impl ApiRequest for ControllerCapabilitiesRequest {
    type Response = ControllerCapabilitiesResponse;

    fn path(&self) -> String {
        "/v0/controller/capabilities".to_string()
    }
}

#[tracing::instrument]
pub async fn handler() -> Response {
    (
        StatusCode::OK,
        Json(ControllerCapabilitiesResponse {
            capabilities: vec!["CREATE_DELETE_VOLUME".to_string()],
        }),
    )
        .into_response()
}
