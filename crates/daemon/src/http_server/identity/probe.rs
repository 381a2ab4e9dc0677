//! Readiness probe endpoint
//!
//! Ready means the configured mount helper is installed and identifies
//! itself; until it does, the orchestrator should not schedule workloads
//! that need this plugin onto the node.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http_server::client::ApiRequest;
use crate::mounter::MounterError;
use crate::state::ServiceState;
use crate::status::{Code, StatusBody};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResponse {
    pub ready: bool,
}

impl ApiRequest for ProbeRequest {
    type Response = ProbeResponse;

    fn path(&self) -> String {
        "/v0/identity/probe".to_string()
    }
}

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Result<impl IntoResponse, ProbeError> {
    let mounter = Arc::clone(state.mounter());
    let ready = tokio::task::spawn_blocking(move || mounter.is_ready())
        .await
        .map_err(|e| ProbeError::Aborted(e.to_string()))??;
    Ok((StatusCode::OK, Json(ProbeResponse { ready })))
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{0}")]
    NotReady(#[from] MounterError),
    #[error("probe task aborted: {0}")]
    Aborted(String),
}

impl ProbeError {
    fn code(&self) -> Code {
        match self {
            ProbeError::NotReady(_) => Code::FailedPrecondition,
            ProbeError::Aborted(_) => Code::Internal,
        }
    }
}

impl IntoResponse for ProbeError {
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
    use crate::bucket::fake::FakeProber;
    use crate::fs::fake::FakeSys;
    use crate::fs::Fs;
    use crate::mounter::fake::FakeMounter;
    use crate::node::NodeMounts;
    use crate::status::Code;

    fn state_with(mounter: FakeMounter) -> ServiceState {
        let fs = Fs::new(Arc::new(FakeSys::new()));
        let mounter: Arc<dyn crate::mounter::Mounter> = Arc::new(mounter);
        let node = Arc::new(NodeMounts::new(fs, Arc::clone(&mounter), None));
        ServiceState::new("test", node, mounter, Arc::new(FakeProber::default()))
    }

    #[tokio::test]
    async fn ready_backend_reports_ready() {
        let state = state_with(FakeMounter::new("fuse.s3fs"));
        let response = handler(State(state)).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ProbeResponse = serde_json::from_slice(&body).unwrap();
        assert!(parsed.ready);
    }

    #[tokio::test]
    async fn helper_failure_maps_to_failed_precondition() {
        let mounter = FakeMounter::new("fuse.s3fs");
        mounter.fail_ready("s3fs: command not found");
        let state = state_with(mounter);

        let err = handler(State(state)).await.map(|_| ()).unwrap_err();
        assert_eq!(err.code(), Code::FailedPrecondition);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: StatusBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.code, Code::FailedPrecondition);
        assert!(
            parsed.message.contains("s3fs: command not found"),
            "got: {}",
            parsed.message
        );
    }
}
