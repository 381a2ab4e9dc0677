//! Mount backends.
//!
//! A backend wraps one external mount-helper program and turns semantic
//! operations (readiness probe, mount bucket at path, report filesystem
//! type) into [`Runner`] invocations. Backends are resolved by name
//! through a constructor registry so new helpers can be added without
//! touching the node state machine.

pub mod fake;
mod s3fs;

pub use s3fs::S3fs;

use std::path::Path;
use std::sync::Arc;

use common::Credentials;

use crate::exec::{ExecError, Runner};

#[derive(Debug, thiserror::Error)]
pub enum MounterError {
    /// The helper ran and exited non-zero; captured stderr attached.
    #[error("failed running {program}: {stderr}")]
    HelperFailed {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    /// The helper could not be started at all.
    #[error(transparent)]
    Exec(#[from] ExecError),
    /// The helper ran but did not identify itself as the expected product.
    #[error("unexpected {program} --version output: {stdout}")]
    UnexpectedVersionOutput { program: String, stdout: String },
}

/// Capability set of one configured mount helper.
pub trait Mounter: Send + Sync {
    /// Probe the helper binary. Requires both a zero exit status and the
    /// expected product identifier on stdout.
    fn is_ready(&self) -> Result<bool, MounterError>;

    /// Mount `bucket` at `target`. Credentials travel via environment
    /// variables only; the target directory must already exist.
    fn mount(
        &self,
        target: &Path,
        bucket: &str,
        credentials: &Credentials,
        read_only: bool,
    ) -> Result<(), MounterError>;

    /// The filesystem-type tag this backend's mounts carry in the mount
    /// table. Fixed per backend, compared for equality only.
    fn fs_type(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
#[error("unknown mounter: {0}")]
pub struct UnknownMounter(pub String);

type Constructor = fn(&Path, Arc<dyn Runner>) -> Arc<dyn Mounter>;

const REGISTRY: &[(&str, Constructor)] = &[(S3fs::NAME, |binary, runner| {
    Arc::new(S3fs::new(binary, runner))
})];

/// Resolve a backend by name.
pub fn new(
    name: &str,
    binary_path: &Path,
    runner: Arc<dyn Runner>,
) -> Result<Arc<dyn Mounter>, UnknownMounter> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, constructor)| constructor(binary_path, runner))
        .ok_or_else(|| UnknownMounter(name.to_string()))
}

/// Names of all registered backends, for help text and error messages.
pub fn names() -> Vec<&'static str> {
    REGISTRY.iter().map(|(name, _)| *name).collect()
}
