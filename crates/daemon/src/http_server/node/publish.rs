//! Publish volume endpoint
//!
//! Mounts the requested bucket at the target path. Safe to call multiple
//! times: a matching existing mount is a success, a mismatched one is a
//! conflict the driver refuses to touch.

use std::collections::HashMap;
use std::path::PathBuf;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http_server::client::ApiRequest;
use crate::node::{PublishError, PublishParams};
use crate::state::ServiceState;
use crate::status::StatusBody;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishVolumeRequest {
    /// Bucket name.
    pub volume_id: String,
    pub target_path: PathBuf,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub secrets: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishVolumeResponse {}

impl ApiRequest for PublishVolumeRequest {
    type Response = PublishVolumeResponse;

    fn path(&self) -> String {
        "/v0/node/publish_volume".to_string()
    }
}

#[tracing::instrument(skip(state, request), fields(volume_id = %request.volume_id, target = %request.target_path.display()))]
pub async fn handler(
    State(state): State<ServiceState>,
    Json(request): Json<PublishVolumeRequest>,
) -> Result<impl IntoResponse, PublishVolumeError> {
    state
        .node()
        .publish(PublishParams {
            volume_id: request.volume_id,
            target_path: request.target_path,
            read_only: request.read_only,
            secrets: request.secrets,
        })
        .await?;
    Ok((StatusCode::OK, Json(PublishVolumeResponse {})))
}

#[derive(Debug, thiserror::Error)]
pub enum PublishVolumeError {
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl IntoResponse for PublishVolumeError {
    fn into_response(self) -> Response {
        let PublishVolumeError::Publish(err) = self;
        let code = err.code();
        (
            code.http_status(),
            Json(StatusBody::new(code, err.to_string())),
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
    use crate::status::Code;

    fn state_with(sys: &FakeSys, mounter: &FakeMounter) -> ServiceState {
        let fs = Fs::new(Arc::new(sys.clone()));
        let mounter: Arc<dyn Mounter> = Arc::new(mounter.clone());
        let node = Arc::new(NodeMounts::new(fs, Arc::clone(&mounter), Some("node-1".into())));
        ServiceState::new("test", node, mounter, Arc::new(FakeProber::default()))
    }

    fn request() -> PublishVolumeRequest {
        PublishVolumeRequest {
            volume_id: "my-bucket".to_string(),
            target_path: PathBuf::from("/var/lib/kubelet/pods/p/volumes/bucket"),
            read_only: false,
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
    async fn publish_succeeds_and_invokes_helper() {
        let sys = FakeSys::new();
        let mounter = FakeMounter::new("fuse.s3fs");
        let state = state_with(&sys, &mounter);

        let response = handler(State(state), Json(request()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(mounter.mount_calls().len(), 1);
    }

    #[tokio::test]
    async fn missing_secret_maps_to_invalid_argument() {
        let sys = FakeSys::new();
        let mounter = FakeMounter::new("fuse.s3fs");
        let state = state_with(&sys, &mounter);

        let mut req = request();
        req.secrets.remove("AWS_SECRET_ACCESS_KEY");
        let err = handler(State(state), Json(req)).await.map(|_| ()).unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: StatusBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.code, Code::InvalidArgument);
        assert!(sys.calls().is_empty(), "no filesystem call may run");
    }

    #[tokio::test]
    async fn mismatched_mount_maps_to_conflict() {
        let sys = FakeSys::new();
        sys.set_mount(
            PathBuf::from("/var/lib/kubelet/pods/p/volumes/bucket"),
            crate::fs::MountDescriptor {
                fs_type: "fuse.s3fs".into(),
                read_only: true,
            },
        );
        let mounter = FakeMounter::new("fuse.s3fs");
        let state = state_with(&sys, &mounter);

        let err = handler(State(state), Json(request()))
            .await
            .map(|_| ())
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(mounter.mount_calls().is_empty());
    }
}
