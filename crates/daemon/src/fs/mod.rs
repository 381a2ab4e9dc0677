//! Filesystem inspection and idempotent mount-point maintenance.
//!
//! Everything here answers "does the filesystem already satisfy the goal?"
//! before mutating anything, so the orchestrator's retries converge
//! instead of tripping over already-exists conditions. The OS mount table
//! is the sole source of truth: observations are re-derived on every call
//! and never cached.

pub mod fake;
mod mount_table;

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

/// An observed, already-mounted filesystem at some path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountDescriptor {
    pub fs_type: String,
    pub read_only: bool,
}

impl MountDescriptor {
    /// Whether this mount is the one a request asks for.
    pub fn matches(&self, fs_type: &str, read_only: bool) -> bool {
        self.fs_type == fs_type && self.read_only == read_only
    }
}

/// What `stat` found at a path, reduced to what the inspector cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Directory,
    Other,
}

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Something that is not a directory sits at the target path. A
    /// misconfiguration signal, never auto-repaired.
    #[error("a non-directory file exists at {}", path.display())]
    NotADirectory { path: PathBuf },
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Low-level filesystem primitives, injectable for tests.
pub trait Sys: Send + Sync {
    /// `stat(2)`; `Ok(None)` when nothing exists at `path`.
    fn path_kind(&self, path: &Path) -> io::Result<Option<PathKind>>;
    /// The mount-table entry whose target is exactly `path`, if any.
    fn mount_entry(&self, path: &Path) -> io::Result<Option<MountDescriptor>>;
    fn make_dir(&self, path: &Path) -> io::Result<()>;
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
    fn unmount(&self, path: &Path) -> io::Result<()>;
}

/// [`Sys`] implementation backed by the real OS.
#[derive(Debug, Clone)]
pub struct SystemSys {
    mounts_path: PathBuf,
}

impl Default for SystemSys {
    fn default() -> Self {
        Self {
            mounts_path: PathBuf::from("/proc/self/mounts"),
        }
    }
}

impl SystemSys {
    /// Read the mount table from an alternate file. Tests point this at a
    /// fixture; production always uses `/proc/self/mounts`.
    pub fn with_mounts_path(mounts_path: impl Into<PathBuf>) -> Self {
        Self {
            mounts_path: mounts_path.into(),
        }
    }
}

impl Sys for SystemSys {
    fn path_kind(&self, path: &Path) -> io::Result<Option<PathKind>> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(Some(PathKind::Directory)),
            Ok(_) => Ok(Some(PathKind::Other)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn mount_entry(&self, path: &Path) -> io::Result<Option<MountDescriptor>> {
        let table = std::fs::read_to_string(&self.mounts_path)?;
        Ok(mount_table::find_entry(&table, path))
    }

    fn make_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir(path)
    }

    fn unmount(&self, path: &Path) -> io::Result<()> {
        let target = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))?;
        // SAFETY: target is a valid NUL-terminated C string.
        let rc = unsafe { libc::umount(target.as_ptr()) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// High-level, idempotent filesystem operations over a [`Sys`].
#[derive(Clone)]
pub struct Fs {
    sys: Arc<dyn Sys>,
}

impl Default for Fs {
    fn default() -> Self {
        Self::new(Arc::new(SystemSys::default()))
    }
}

impl Fs {
    pub fn new(sys: Arc<dyn Sys>) -> Self {
        Self { sys }
    }

    /// Look for a mount at `path`.
    ///
    /// "Path does not exist" and "path is not a mount point" are normal
    /// outcomes mapped to `Ok(None)`; only genuine stat or mount-table
    /// failures are errors.
    pub fn find_mount(&self, path: &Path) -> Result<Option<MountDescriptor>, FsError> {
        let kind = self
            .sys
            .path_kind(path)
            .map_err(|e| FsError::io("stat", path, e))?;
        if kind.is_none() {
            return Ok(None);
        }
        self.sys
            .mount_entry(path)
            .map_err(|e| FsError::io("reading mount table for", path, e))
    }

    /// Idempotently make a directory at `path` with default permissions.
    pub fn ensure_dir_exists(&self, path: &Path) -> Result<(), FsError> {
        match self
            .sys
            .path_kind(path)
            .map_err(|e| FsError::io("stat", path, e))?
        {
            None => self
                .sys
                .make_dir(path)
                .map_err(|e| FsError::io("mkdir", path, e)),
            Some(PathKind::Directory) => Ok(()),
            Some(PathKind::Other) => Err(FsError::NotADirectory {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Idempotently remove the mount and directory at `path`.
    ///
    /// Unmount strictly precedes directory removal; if the unmount fails
    /// the directory is left in place so a still-mounted path is never
    /// orphaned.
    pub fn ensure_mount_removed(&self, path: &Path) -> Result<(), FsError> {
        debug!(path = %path.display(), "removing mount point");
        let kind = self
            .sys
            .path_kind(path)
            .map_err(|e| FsError::io("stat", path, e))?;
        if kind.is_none() {
            return Ok(());
        }
        let mounted = self
            .sys
            .mount_entry(path)
            .map_err(|e| FsError::io("reading mount table for", path, e))?;
        if mounted.is_some() {
            self.sys
                .unmount(path)
                .map_err(|e| FsError::io("umount", path, e))?;
        }
        self.sys
            .remove_dir(path)
            .map_err(|e| FsError::io("rmdir", path, e))
    }
}
