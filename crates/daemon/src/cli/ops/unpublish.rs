use std::path::PathBuf;

use clap::Args;

use crate::cli::op::{Op, OpContext};
use crate::http_server::client::ApiError;
use crate::http_server::node::unpublish::UnpublishVolumeRequest;

#[derive(Args, Debug, Clone)]
pub struct Unpublish {
    /// Target path to tear down
    pub target_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum UnpublishOpError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for Unpublish {
    type Error = UnpublishOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client
            .call(UnpublishVolumeRequest {
                volume_id: None,
                target_path: self.target_path.clone(),
            })
            .await?;
        Ok(format!("unpublished {}", self.target_path.display()))
    }
}
