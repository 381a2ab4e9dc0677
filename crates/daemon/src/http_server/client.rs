//! Caller side of the RPC surface.
//!
//! [`UnixClient`] speaks HTTP/1.1 over the daemon's unix socket with a
//! fresh connection per call; CSI traffic is far too sparse to be worth
//! pooling. Request types implement [`ApiRequest`] next to their handler
//! so the two sides cannot drift apart.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::UnixStream;

use crate::status::StatusBody;

/// One RPC operation: where it goes and what comes back.
pub trait ApiRequest: Serialize {
    type Response: DeserializeOwned;

    fn path(&self) -> String;

    fn method(&self) -> http::Method {
        http::Method::POST
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("could not connect to {}: {source}", socket.display())]
    Connect {
        socket: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Hyper(#[from] hyper::Error),
    #[error(transparent)]
    Http(#[from] http::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The daemon answered with a protocol status.
    #[error("{:?}: {}", .0.code, .0.message)]
    Rpc(StatusBody),
    /// Non-success response that did not carry a protocol status body.
    #[error("unexpected HTTP status {0}: {1}")]
    HttpStatus(http::StatusCode, String),
}

#[derive(Debug, Clone)]
pub struct UnixClient {
    socket_path: PathBuf,
}

impl UnixClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|source| ApiError::Connect {
                socket: self.socket_path.clone(),
                source,
            })?;
        let (mut sender, connection) =
            hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
        // drives the connection; resolves once the response is consumed
        tokio::spawn(connection);

        let body = serde_json::to_vec(&request)?;
        let http_request = http::Request::builder()
            .method(request.method())
            .uri(request.path())
            .header(http::header::HOST, "localhost")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))?;

        let response = sender.send_request(http_request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }
        match serde_json::from_slice::<StatusBody>(&bytes) {
            Ok(status_body) => Err(ApiError::Rpc(status_body)),
            Err(_) => Err(ApiError::HttpStatus(
                status,
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
        }
    }
}
