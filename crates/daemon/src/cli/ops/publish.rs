use std::collections::HashMap;
use std::path::PathBuf;

use clap::Args;

use crate::cli::op::{Op, OpContext};
use crate::http_server::client::ApiError;
use crate::http_server::node::publish::PublishVolumeRequest;

#[derive(Args, Debug, Clone)]
pub struct Publish {
    /// Bucket name
    pub bucket: String,

    /// Target path to mount at
    pub target_path: PathBuf,

    /// Mount read-only
    #[arg(long)]
    pub read_only: bool,

    /// Access key id; read from the environment, never from argv
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: String,

    /// Secret access key; read from the environment, never from argv
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishOpError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for Publish {
    type Error = PublishOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let secrets = HashMap::from([
            (
                common::credentials::SECRETS_ACCESS_KEY_ID.to_string(),
                self.access_key_id.clone(),
            ),
            (
                common::credentials::SECRETS_SECRET_ACCESS_KEY.to_string(),
                self.secret_access_key.clone(),
            ),
        ]);
        ctx.client
            .call(PublishVolumeRequest {
                volume_id: self.bucket.clone(),
                target_path: self.target_path.clone(),
                read_only: self.read_only,
                secrets,
            })
            .await?;
        Ok(format!(
            "published {} at {}",
            self.bucket,
            self.target_path.display()
        ))
    }
}
