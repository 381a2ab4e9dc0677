use std::path::PathBuf;

use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::cli::op::{Op, OpContext};
use crate::config::Config;
use crate::server::{self, ServerError};

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Node identifier reported to the orchestrator
    #[arg(long, env = "NODE_ID")]
    pub node_id: Option<String>,

    /// Mount backend
    #[arg(long, default_value = "s3fs")]
    pub mounter: String,

    /// Path to the mount backend binary
    #[arg(long, default_value = "/usr/local/bin/s3fs")]
    pub mounter_binary_path: PathBuf,

    /// Driver release version reported in plugin info
    #[arg(long, default_value = "dev")]
    pub driver_version: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeOpError {
    #[error(transparent)]
    Server(#[from] ServerError),
}

#[async_trait::async_trait]
impl Op for Serve {
    type Error = ServeOpError;
    type Output = ();

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        let config = Config {
            csi_address: ctx.socket_path.clone(),
            node_id: self.node_id.clone(),
            mounter: self.mounter.clone(),
            mounter_binary_path: self.mounter_binary_path.clone(),
            driver_version: self.driver_version.clone(),
        };
        server::run(config).await?;
        Ok(())
    }
}
