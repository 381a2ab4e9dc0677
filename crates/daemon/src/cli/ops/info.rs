use clap::Args;

use crate::cli::op::{Op, OpContext};
use crate::http_server::client::ApiError;
use crate::http_server::node::info::NodeInfoRequest;

#[derive(Args, Debug, Clone)]
pub struct Info;

#[derive(Debug, thiserror::Error)]
pub enum InfoOpError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for Info {
    type Error = InfoOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(NodeInfoRequest {}).await?;
        Ok(response.node_id)
    }
}
