//! Unpublish volume endpoint
//!
//! The orchestrator calls this unconditionally during teardown, whether
//! or not publish ever completed, so "nothing there" is a success.

use std::path::PathBuf;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http_server::client::ApiRequest;
use crate::node::UnpublishError;
use crate::state::ServiceState;
use crate::status::StatusBody;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnpublishVolumeRequest {
    #[serde(default)]
    pub volume_id: Option<String>,
    pub target_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnpublishVolumeResponse {}

impl ApiRequest for UnpublishVolumeRequest {
    type Response = UnpublishVolumeResponse;

    fn path(&self) -> String {
        "/v0/node/unpublish_volume".to_string()
    }
}

#[tracing::instrument(skip(state, request), fields(target = %request.target_path.display()))]
pub async fn handler(
    State(state): State<ServiceState>,
    Json(request): Json<UnpublishVolumeRequest>,
) -> Result<impl IntoResponse, UnpublishVolumeError> {
    state.node().unpublish(request.target_path).await?;
    Ok((StatusCode::OK, Json(UnpublishVolumeResponse {})))
}

#[derive(Debug, thiserror::Error)]
pub enum UnpublishVolumeError {
    #[error(transparent)]
    Unpublish(#[from] UnpublishError),
}

impl IntoResponse for UnpublishVolumeError {
    fn into_response(self) -> Response {
        let UnpublishVolumeError::Unpublish(err) = self;
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
    use crate::fs::{Fs, MountDescriptor};
    use crate::mounter::fake::FakeMounter;
    use crate::mounter::Mounter;
    use crate::node::NodeMounts;

    fn state_with(sys: &FakeSys) -> ServiceState {
        let fs = Fs::new(Arc::new(sys.clone()));
        let mounter: Arc<dyn Mounter> = Arc::new(FakeMounter::new("fuse.s3fs"));
        let node = Arc::new(NodeMounts::new(fs, Arc::clone(&mounter), None));
        ServiceState::new("test", node, mounter, Arc::new(FakeProber::default()))
    }

    #[tokio::test]
    async fn unpublish_on_empty_path_is_ok() {
        let sys = FakeSys::new();
        let state = state_with(&sys);
        let request = UnpublishVolumeRequest {
            volume_id: None,
            target_path: PathBuf::from("/var/lib/kubelet/pods/p/volumes/bucket"),
        };
        let response = handler(State(state), Json(request))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unpublish_removes_existing_mount() {
        let target = PathBuf::from("/var/lib/kubelet/pods/p/volumes/bucket");
        let sys = FakeSys::new();
        sys.set_mount(
            target.clone(),
            MountDescriptor {
                fs_type: "fuse.s3fs".into(),
                read_only: false,
            },
        );
        let state = state_with(&sys);
        let request = UnpublishVolumeRequest {
            volume_id: Some("my-bucket".into()),
            target_path: target.clone(),
        };
        let response = handler(State(state), Json(request))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(sys.is_absent(&target));
    }
}
