//! Command-line interface.
//!
//! `s3csi serve` runs the daemon; the remaining commands are an operator
//! surface that speaks to a running daemon over its unix socket, useful
//! for debugging a node without going through the orchestrator.

pub mod op;
pub mod ops;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::http_server::client::UnixClient;
use op::{Op, OpContext};

#[derive(Parser, Debug)]
#[command(name = "s3csi", about = "CSI driver exposing S3 buckets as pod volumes")]
pub struct Cli {
    /// Path of the unix socket the RPC services are served on
    #[arg(
        long = "csi-address",
        global = true,
        default_value = "/csi/csi.sock",
        env = "CSI_ADDRESS"
    )]
    pub csi_address: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the driver daemon
    Serve(ops::serve::Serve),
    /// Ask a running daemon whether its mount helper is ready
    Probe(ops::probe::Probe),
    /// Publish a bucket at a target path via a running daemon
    Publish(ops::publish::Publish),
    /// Unpublish whatever is mounted at a target path
    Unpublish(ops::unpublish::Unpublish),
    /// Show the node identity a running daemon reports
    Info(ops::info::Info),
    /// Print build information
    Version(ops::version::Version),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let ctx = OpContext {
            client: UnixClient::new(&self.csi_address),
            socket_path: self.csi_address.clone(),
        };
        match self.command {
            Command::Serve(op) => {
                op.execute(&ctx).await?;
            }
            Command::Probe(op) => println!("{}", op.execute(&ctx).await?),
            Command::Publish(op) => println!("{}", op.execute(&ctx).await?),
            Command::Unpublish(op) => println!("{}", op.execute(&ctx).await?),
            Command::Info(op) => println!("{}", op.execute(&ctx).await?),
            Command::Version(op) => println!("{}", op.execute(&ctx).await?),
        }
        Ok(())
    }
}
