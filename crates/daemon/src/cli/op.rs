use std::path::PathBuf;

use crate::http_server::client::UnixClient;

/// Context handed to every CLI operation.
pub struct OpContext {
    pub client: UnixClient,
    pub socket_path: PathBuf,
}

/// One CLI operation with a typed output and error.
#[async_trait::async_trait]
pub trait Op {
    type Error: std::error::Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}
