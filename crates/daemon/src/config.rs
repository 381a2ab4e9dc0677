//! Runtime configuration.

use std::path::PathBuf;

/// Everything the daemon needs to come up, assembled by the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the unix socket the RPC services are served on.
    pub csi_address: PathBuf,
    /// Node identity reported via node info. Optional at startup, but
    /// node-info calls fail until one is configured.
    pub node_id: Option<String>,
    /// Mount backend name; see [`crate::mounter::names`].
    pub mounter: String,
    /// Path to the mount backend binary.
    pub mounter_binary_path: PathBuf,
    /// Release version reported in plugin info.
    pub driver_version: String,
}
