//! Scripted [`Mounter`] double.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::Credentials;
use parking_lot::Mutex;

use super::{Mounter, MounterError};

/// One recorded `mount` call. The secret key is deliberately not captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountCall {
    pub target: PathBuf,
    pub bucket: String,
    pub access_key_id: String,
    pub read_only: bool,
}

#[derive(Default)]
struct Inner {
    mounts: Vec<MountCall>,
    ready_error: Option<String>,
    mount_error: Option<String>,
}

/// Records mount invocations and replays scripted failures.
#[derive(Clone)]
pub struct FakeMounter {
    fs_type: String,
    inner: Arc<Mutex<Inner>>,
}

impl FakeMounter {
    pub fn new(fs_type: impl Into<String>) -> Self {
        Self {
            fs_type: fs_type.into(),
            inner: Arc::default(),
        }
    }

    /// Make `is_ready` fail with the given helper stderr text.
    pub fn fail_ready(&self, stderr: &str) {
        self.inner.lock().ready_error = Some(stderr.to_string());
    }

    /// Make every subsequent `mount` fail with the given stderr text.
    pub fn fail_mounts(&self, stderr: &str) {
        self.inner.lock().mount_error = Some(stderr.to_string());
    }

    pub fn mount_calls(&self) -> Vec<MountCall> {
        self.inner.lock().mounts.clone()
    }
}

impl Mounter for FakeMounter {
    fn is_ready(&self) -> Result<bool, MounterError> {
        match &self.inner.lock().ready_error {
            Some(stderr) => Err(MounterError::HelperFailed {
                program: "fake-mounter".to_string(),
                exit_code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(true),
        }
    }

    fn mount(
        &self,
        target: &Path,
        bucket: &str,
        credentials: &Credentials,
        read_only: bool,
    ) -> Result<(), MounterError> {
        let mut inner = self.inner.lock();
        if let Some(stderr) = &inner.mount_error {
            return Err(MounterError::HelperFailed {
                program: "fake-mounter".to_string(),
                exit_code: Some(1),
                stderr: stderr.clone(),
            });
        }
        inner.mounts.push(MountCall {
            target: target.to_path_buf(),
            bucket: bucket.to_string(),
            access_key_id: credentials.access_key_id().to_string(),
            read_only,
        });
        Ok(())
    }

    fn fs_type(&self) -> &str {
        &self.fs_type
    }
}
