//! Node-side volume lifecycle.
//!
//! [`NodeMounts`] converges a target path toward "bucket mounted here" or
//! "nothing here". State is observed, never stored: each call re-derives
//! ground truth from the directory, the OS mount table, and the helper's
//! exit status, so the orchestrator can retry any call at any time.
//!
//! Calls for the same target path are serialized through [`PathLocks`];
//! calls for different paths run concurrently. The sequences themselves
//! are blocking filesystem/process code; the `async` wrappers bridge onto
//! the runtime with `spawn_blocking`.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::Credentials;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::fs::{Fs, FsError};
use crate::mounter::{Mounter, MounterError};
use crate::status::Code;

/// Keyed mutex serializing operations per target path.
#[derive(Default)]
pub struct PathLocks {
    map: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    /// Run `f` while holding the lock for `path`.
    pub fn locked<R>(&self, path: &Path, f: impl FnOnce() -> R) -> R {
        let slot = {
            let mut map = self.map.lock();
            map.entry(path.to_path_buf()).or_default().clone()
        };
        let result = {
            let _guard = slot.lock();
            f()
        };
        // Slot clones are created and released only under the map lock,
        // so the count here is exact: once only the map's copy remains,
        // the slot can be retired.
        let mut map = self.map.lock();
        let remaining = Arc::strong_count(&slot) - 1;
        drop(slot);
        if remaining == 1 {
            map.remove(path);
        }
        result
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map.lock().len()
    }
}

/// A node publish request, after transport decoding.
#[derive(Clone)]
pub struct PublishParams {
    /// Bucket name.
    pub volume_id: String,
    pub target_path: PathBuf,
    pub read_only: bool,
    pub secrets: HashMap<String, String>,
}

impl fmt::Debug for PublishParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.secrets.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("PublishParams")
            .field("volume_id", &self.volume_id)
            .field("target_path", &self.target_path)
            .field("read_only", &self.read_only)
            .field("secret_keys", &keys)
            .finish()
    }
}

/// How a publish converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Published {
    /// A fresh mount was created.
    Mounted,
    /// A matching mount was already in place; nothing was done.
    AlreadyMounted,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("object storage credentials not provided")]
    MissingCredentials,
    /// A mount exists at the target but is not the requested one. Never
    /// auto-resolved; an operator has to look at it.
    #[error("a different mount already exists at {}", path.display())]
    Mismatched { path: PathBuf },
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error(transparent)]
    Mount(#[from] MounterError),
    #[error("publish task aborted: {0}")]
    Aborted(String),
}

impl PublishError {
    pub fn code(&self) -> Code {
        match self {
            PublishError::MissingCredentials => Code::InvalidArgument,
            PublishError::Mismatched { .. } => Code::AlreadyExists,
            PublishError::Fs(_) | PublishError::Mount(_) | PublishError::Aborted(_) => {
                Code::Internal
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UnpublishError {
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error("unpublish task aborted: {0}")]
    Aborted(String),
}

impl UnpublishError {
    pub fn code(&self) -> Code {
        Code::Internal
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NodeInfoError {
    /// Without a node identity the orchestrator cannot route volume
    /// attachments, so this is a hard failure rather than an empty reply.
    #[error("node id not configured")]
    MissingNodeId,
}

impl NodeInfoError {
    pub fn code(&self) -> Code {
        Code::Internal
    }
}

/// The per-node mount lifecycle. Cheap to clone; clones share the same
/// path locks.
#[derive(Clone)]
pub struct NodeMounts {
    fs: Fs,
    mounter: Arc<dyn Mounter>,
    node_id: Option<String>,
    locks: Arc<PathLocks>,
}

impl NodeMounts {
    pub fn new(fs: Fs, mounter: Arc<dyn Mounter>, node_id: Option<String>) -> Self {
        Self {
            fs,
            mounter,
            node_id,
            locks: Arc::new(PathLocks::default()),
        }
    }

    pub fn node_id(&self) -> Result<&str, NodeInfoError> {
        self.node_id.as_deref().ok_or(NodeInfoError::MissingNodeId)
    }

    /// Blocking publish; async callers go through [`NodeMounts::publish`].
    ///
    /// Credentials are validated before any filesystem or process call so
    /// a malformed request leaves no trace on the node.
    pub fn publish_blocking(&self, params: &PublishParams) -> Result<Published, PublishError> {
        let credentials =
            Credentials::from_secrets(&params.secrets).ok_or(PublishError::MissingCredentials)?;
        self.locks.locked(&params.target_path, || {
            self.converge_publish(params, &credentials)
        })
    }

    fn converge_publish(
        &self,
        params: &PublishParams,
        credentials: &Credentials,
    ) -> Result<Published, PublishError> {
        let target = &params.target_path;
        if let Some(existing) = self.fs.find_mount(target)? {
            if existing.matches(self.mounter.fs_type(), params.read_only) {
                debug!(target = %target.display(), "already mounted, nothing to do");
                return Ok(Published::AlreadyMounted);
            }
            return Err(PublishError::Mismatched {
                path: target.clone(),
            });
        }
        self.fs.ensure_dir_exists(target)?;
        self.mounter.mount(
            target,
            &params.volume_id,
            credentials,
            params.read_only,
        )?;
        info!(
            volume = %params.volume_id,
            target = %target.display(),
            read_only = params.read_only,
            "volume published"
        );
        Ok(Published::Mounted)
    }

    /// Blocking unpublish. Succeeds as a no-op when nothing is mounted and
    /// nothing exists at the path; teardown is called unconditionally by
    /// the orchestrator.
    pub fn unpublish_blocking(&self, target: &Path) -> Result<(), UnpublishError> {
        self.locks.locked(target, || {
            self.fs.ensure_mount_removed(target)?;
            info!(target = %target.display(), "volume unpublished");
            Ok(())
        })
    }

    pub async fn publish(&self, params: PublishParams) -> Result<Published, PublishError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.publish_blocking(&params))
            .await
            .unwrap_or_else(|e| Err(PublishError::Aborted(e.to_string())))
    }

    pub async fn unpublish(&self, target: PathBuf) -> Result<(), UnpublishError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.unpublish_blocking(&target))
            .await
            .unwrap_or_else(|e| Err(UnpublishError::Aborted(e.to_string())))
    }
}
