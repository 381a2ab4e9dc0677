//! Create volume endpoint
//!
//! Static provisioning: the bucket must already exist; this call only
//! validates it and returns the bucket name as the volume id.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::Credentials;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::bucket::BucketProbeError;
use crate::http_server::client::ApiRequest;
use crate::state::ServiceState;
use crate::status::{Code, StatusBody};

/// Region assumed when the storage class does not name one.
const DEFAULT_REGION: &str = "eu-west-2";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVolumeRequest {
    pub name: String,
    /// Storage-class parameters; `bucket` is required, `region` optional.
    #[serde(default)]
    pub parameters: HashMap<String, String>,
    #[serde(default)]
    pub secrets: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVolumeResponse {
    pub volume: Volume,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub volume_id: String,
    pub capacity_bytes: u64,
    pub volume_context: HashMap<String, String>,
}

impl ApiRequest for CreateVolumeRequest {
    type Response = CreateVolumeResponse;

    fn path(&self) -> String {
        "/v0/controller/create_volume".to_string()
    }
}

#[tracing::instrument(skip(state, request), fields(name = %request.name))]
pub async fn handler(
    State(state): State<ServiceState>,
    Json(request): Json<CreateVolumeRequest>,
) -> Result<impl IntoResponse, CreateVolumeError> {
    let credentials = Credentials::from_secrets(&request.secrets)
        .ok_or(CreateVolumeError::MissingCredentials)?;
    let bucket = request
        .parameters
        .get("bucket")
        .ok_or(CreateVolumeError::MissingBucketParameter)?;
    let region = request
        .parameters
        .get("region")
        .map(String::as_str)
        .unwrap_or(DEFAULT_REGION);

    let exists = state
        .prober()
        .exists(bucket, region, &credentials)
        .await?;
    if !exists {
        return Err(CreateVolumeError::BucketNotFound {
            bucket: bucket.clone(),
        });
    }

    let volume_context =
        HashMap::from([("region".to_string(), region.to_string())]);
    Ok((
        StatusCode::OK,
        Json(CreateVolumeResponse {
            volume: Volume {
                volume_id: bucket.clone(),
                capacity_bytes: 0,
                volume_context,
            },
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum CreateVolumeError {
    #[error("object storage credentials not provided")]
    MissingCredentials,
    #[error("bucket name not provided")]
    MissingBucketParameter,
    #[error("static bucket mounting requested, but bucket {bucket} not found")]
    BucketNotFound { bucket: String },
    #[error(transparent)]
    Probe(#[from] BucketProbeError),
}

impl CreateVolumeError {
    fn code(&self) -> Code {
        match self {
            CreateVolumeError::MissingCredentials
            | CreateVolumeError::MissingBucketParameter => Code::InvalidArgument,
            CreateVolumeError::BucketNotFound { .. } => Code::NotFound,
            CreateVolumeError::Probe(_) => Code::Internal,
        }
    }
}

impl IntoResponse for CreateVolumeError {
    fn into_response(self) -> Response {
        let code = self.code();
        (
            code.http_status(),
            Json(StatusBody::new(code, self.to_string())),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::bucket::fake::FakeProber;
    use crate::fs::fake::FakeSys;
    use crate::fs::Fs;
    use crate::mounter::fake::FakeMounter;
    use crate::mounter::Mounter;
    use crate::node::NodeMounts;

    fn state_with(prober: FakeProber) -> ServiceState {
        let fs = Fs::new(Arc::new(FakeSys::new()));
        let mounter: Arc<dyn Mounter> = Arc::new(FakeMounter::new("fuse.s3fs"));
        let node = Arc::new(NodeMounts::new(fs, Arc::clone(&mounter), None));
        ServiceState::new("test", node, mounter, Arc::new(prober))
    }

    fn request() -> CreateVolumeRequest {
        CreateVolumeRequest {
            name: "pv-claim-1".to_string(),
            parameters: [("bucket", "my-bucket")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            secrets: [
                ("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE"),
                ("AWS_SECRET_ACCESS_KEY", "sekrit"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        }
    }

    #[tokio::test]
    async fn existing_bucket_becomes_the_volume() {
        let prober = FakeProber::reporting(true);
        let state = state_with(prober.clone());
        let response = handler(State(state), Json(request()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: CreateVolumeResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.volume.volume_id, "my-bucket");
        assert_eq!(
            prober.calls(),
            vec![("my-bucket".to_string(), "eu-west-2".to_string())]
        );
    }

    #[tokio::test]
    async fn region_parameter_overrides_default() {
        let prober = FakeProber::reporting(true);
        let state = state_with(prober.clone());
        let mut req = request();
        req.parameters
            .insert("region".to_string(), "us-east-1".to_string());
        handler(State(state), Json(req)).await.unwrap();
        assert_eq!(prober.calls()[0].1, "us-east-1");
    }

    #[tokio::test]
    async fn absent_bucket_is_not_found() {
        let state = state_with(FakeProber::reporting(false));
        let err = handler(State(state), Json(request()))
            .await
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn missing_bucket_parameter_is_invalid_argument() {
        let prober = FakeProber::reporting(true);
        let state = state_with(prober.clone());
        let mut req = request();
        req.parameters.clear();
        let err = handler(State(state), Json(req)).await.map(|_| ()).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert!(prober.calls().is_empty(), "probe must not run");
    }

    #[tokio::test]
    async fn missing_credentials_is_invalid_argument() {
        let state = state_with(FakeProber::reporting(true));
        let mut req = request();
        req.secrets.clear();
        let err = handler(State(state), Json(req)).await.map(|_| ()).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn probe_failure_is_internal() {
        let state = state_with(FakeProber::failing_with_status(500));
        let err = handler(State(state), Json(request()))
            .await
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.code(), Code::Internal);
    }
}
