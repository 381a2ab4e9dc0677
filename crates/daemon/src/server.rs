//! Unix-domain-socket RPC server.
//!
//! Thin transport glue: bind the socket, hand each accepted connection to
//! hyper, route into [`crate::http_server`]. Each connection is served on
//! its own task, so one slow mount helper never blocks another volume's
//! RPCs.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::UnixListener;
use tower::ServiceExt;
use tracing::{debug, info};

use crate::bucket::S3Prober;
use crate::config::Config;
use crate::exec::{Runner, SystemRunner};
use crate::fs::Fs;
use crate::http_server;
use crate::mounter::{self, UnknownMounter};
use crate::node::NodeMounts;
use crate::state::ServiceState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Mounter(#[from] UnknownMounter),
    #[error("could not remove stale socket {}: {source}", path.display())]
    RemoveSocket {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not listen on {}: {source}", path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("accept failed: {0}")]
    Accept(#[from] io::Error),
}

/// Assemble the service from configuration and serve until shutdown.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let runner: Arc<dyn Runner> = Arc::new(SystemRunner);
    let mounter = mounter::new(&config.mounter, &config.mounter_binary_path, runner)?;
    let node = Arc::new(NodeMounts::new(
        Fs::default(),
        Arc::clone(&mounter),
        config.node_id.clone(),
    ));
    let state = ServiceState::new(
        config.driver_version.clone(),
        node,
        mounter,
        Arc::new(S3Prober::new()),
    );
    serve(&config.csi_address, state).await
}

/// Serve RPCs on `socket_path` until ctrl-c.
pub async fn serve(socket_path: &Path, state: ServiceState) -> Result<(), ServerError> {
    // a previous run may have left the socket file behind
    match std::fs::remove_file(socket_path) {
        Ok(()) => debug!(socket = %socket_path.display(), "removed stale socket"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ServerError::RemoveSocket {
                path: socket_path.to_path_buf(),
                source,
            })
        }
    }

    let listener = UnixListener::bind(socket_path).map_err(|source| ServerError::Bind {
        path: socket_path.to_path_buf(),
        source,
    })?;
    info!(socket = %socket_path.display(), "serving CSI RPCs");

    let router = http_server::router(state);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }
            accepted = listener.accept() => {
                let (stream, _addr) = accepted?;
                let tower_service = router.clone();
                tokio::spawn(async move {
                    let service = hyper::service::service_fn(
                        move |request: Request<Incoming>| {
                            tower_service.clone().oneshot(request)
                        },
                    );
                    if let Err(error) = hyper::server::conn::http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        debug!(%error, "connection closed with error");
                    }
                });
            }
        }
    }

    if let Err(error) = std::fs::remove_file(socket_path) {
        debug!(%error, "could not remove socket on shutdown");
    }
    Ok(())
}
