use clap::Args;

use crate::cli::op::{Op, OpContext};
use crate::http_server::client::ApiError;
use crate::http_server::identity::probe::ProbeRequest;

#[derive(Args, Debug, Clone)]
pub struct Probe;

#[derive(Debug, thiserror::Error)]
pub enum ProbeOpError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl Op for Probe {
    type Error = ProbeOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(ProbeRequest {}).await?;
        Ok(if response.ready {
            "ready".to_string()
        } else {
            "not ready".to_string()
        })
    }
}
