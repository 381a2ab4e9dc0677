//! Node info endpoint

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http_server::client::ApiRequest;
use crate::node::NodeInfoError;
use crate::state::ServiceState;
use crate::status::StatusBody;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeInfoRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeInfoResponse {
    pub node_id: String,
}

impl ApiRequest for NodeInfoRequest {
    type Response = NodeInfoResponse;

    fn path(&self) -> String {
        "/v0/node/info".to_string()
    }
}

#[tracing::instrument(skip(state))]
pub async fn handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, NodeInfoRequestError> {
    let node_id = state.node().node_id()?.to_string();
    Ok((StatusCode::OK, Json(NodeInfoResponse { node_id })))
}

#[derive(Debug, thiserror::Error)]
pub enum NodeInfoRequestError {
    #[error(transparent)]
    NodeInfo(#[from] NodeInfoError),
}

impl IntoResponse for NodeInfoRequestError {
    fn into_response(self) -> Response {
        let NodeInfoRequestError::NodeInfo(err) = self;
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

    fn state_with_node_id(node_id: Option<&str>) -> ServiceState {
        let fs = Fs::new(Arc::new(FakeSys::new()));
        let mounter: Arc<dyn Mounter> = Arc::new(FakeMounter::new("fuse.s3fs"));
        let node = Arc::new(NodeMounts::new(
            fs,
            Arc::clone(&mounter),
            node_id.map(String::from),
        ));
        ServiceState::new("test", node, mounter, Arc::new(FakeProber::default()))
    }

    #[tokio::test]
    async fn reports_configured_node_id() {
        let response = handler(State(state_with_node_id(Some("worker-7"))))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: NodeInfoResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.node_id, "worker-7");
    }

    #[tokio::test]
    async fn missing_node_id_is_internal() {
        let err = handler(State(state_with_node_id(None)))
            .await
            .map(|_| ())
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
