//! Plugin info endpoint

use std::collections::HashMap;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http_server::client::ApiRequest;
use crate::state::ServiceState;

/// Name the orchestrator knows this driver by.
pub const DRIVER_NAME: &str = "s3.csi.s3csi.dev";
pub const DRIVER_REPO: &str = "https://github.com/s3csi/s3csi";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfoRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfoResponse {
    pub name: String,
    pub vendor_version: String,
    pub manifest: HashMap<String, String>,
}

impl ApiRequest for PluginInfoRequest {
    type Response = PluginInfoResponse;

    fn path(&self) -> String {
        "/v0/identity/plugin_info".to_string()
    }
}

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Response {
    let manifest = HashMap::from([("url".to_string(), DRIVER_REPO.to_string())]);
    (
        StatusCode::OK,
        Json(PluginInfoResponse {
            name: DRIVER_NAME.to_string(),
            vendor_version: state.vendor_version().to_string(),
            manifest,
        }),
    )
        .into_response()
}
