use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http_server::client::ApiRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub build_timestamp: String,
    pub features: String,
}

impl ApiRequest for VersionRequest {
    type Response = VersionResponse;

    fn path(&self) -> String {
        "/_status/version".to_string()
    }

    fn method(&self) -> http::Method {
        http::Method::GET
    }
}

#[tracing::instrument]
pub async fn handler() -> Response {
    let info = crate::build_info();
    (
        StatusCode::OK,
        Json(VersionResponse {
            version: info.version.to_string(),
            build_timestamp: info.build_timestamp.to_string(),
            features: info.features.to_string(),
        }),
    )
        .into_response()
}
