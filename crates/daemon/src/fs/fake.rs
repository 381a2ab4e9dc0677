//! Scriptable [`Sys`] double.
//!
//! Holds a simulated view of the paths the inspector touches and records
//! every call, so tests can assert both on outcomes and on operation
//! ordering. Mutations behave like the real thing: `make_dir` creates,
//! `unmount` turns a mount back into a plain directory, `remove_dir`
//! refuses to remove a mount point.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{MountDescriptor, PathKind, Sys};

/// One recorded [`Sys`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SysCall {
    Stat(PathBuf),
    MountEntry(PathBuf),
    MakeDir(PathBuf),
    RemoveDir(PathBuf),
    Unmount(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File,
    Mount(MountDescriptor),
}

#[derive(Default)]
struct Inner {
    nodes: HashMap<PathBuf, Node>,
    calls: Vec<SysCall>,
    stat_err: Option<String>,
    mount_entry_err: Option<String>,
    make_dir_err: Option<String>,
    remove_dir_err: Option<String>,
    unmount_err: Option<String>,
}

#[derive(Clone, Default)]
pub struct FakeSys(Arc<Mutex<Inner>>);

impl FakeSys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dir(&self, path: impl Into<PathBuf>) {
        self.0.lock().nodes.insert(path.into(), Node::Dir);
    }

    pub fn set_file(&self, path: impl Into<PathBuf>) {
        self.0.lock().nodes.insert(path.into(), Node::File);
    }

    /// A mount point is also a directory as far as `stat` is concerned.
    pub fn set_mount(&self, path: impl Into<PathBuf>, descriptor: MountDescriptor) {
        self.0
            .lock()
            .nodes
            .insert(path.into(), Node::Mount(descriptor));
    }

    pub fn fail_stat(&self, message: &str) {
        self.0.lock().stat_err = Some(message.to_string());
    }

    pub fn fail_mount_entry(&self, message: &str) {
        self.0.lock().mount_entry_err = Some(message.to_string());
    }

    pub fn fail_make_dir(&self, message: &str) {
        self.0.lock().make_dir_err = Some(message.to_string());
    }

    pub fn fail_remove_dir(&self, message: &str) {
        self.0.lock().remove_dir_err = Some(message.to_string());
    }

    pub fn fail_unmount(&self, message: &str) {
        self.0.lock().unmount_err = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<SysCall> {
        self.0.lock().calls.clone()
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        matches!(self.0.lock().nodes.get(path), Some(Node::Dir))
    }

    pub fn is_mounted(&self, path: &Path) -> bool {
        matches!(self.0.lock().nodes.get(path), Some(Node::Mount(_)))
    }

    pub fn is_absent(&self, path: &Path) -> bool {
        !self.0.lock().nodes.contains_key(path)
    }
}

fn scripted_err(slot: &Option<String>) -> io::Result<()> {
    match slot {
        Some(message) => Err(io::Error::other(message.clone())),
        None => Ok(()),
    }
}

impl Sys for FakeSys {
    fn path_kind(&self, path: &Path) -> io::Result<Option<PathKind>> {
        let mut inner = self.0.lock();
        inner.calls.push(SysCall::Stat(path.to_path_buf()));
        scripted_err(&inner.stat_err)?;
        Ok(match inner.nodes.get(path) {
            None => None,
            Some(Node::File) => Some(PathKind::Other),
            Some(Node::Dir) | Some(Node::Mount(_)) => Some(PathKind::Directory),
        })
    }

    fn mount_entry(&self, path: &Path) -> io::Result<Option<MountDescriptor>> {
        let mut inner = self.0.lock();
        inner.calls.push(SysCall::MountEntry(path.to_path_buf()));
        scripted_err(&inner.mount_entry_err)?;
        Ok(match inner.nodes.get(path) {
            Some(Node::Mount(descriptor)) => Some(descriptor.clone()),
            _ => None,
        })
    }

    fn make_dir(&self, path: &Path) -> io::Result<()> {
        let mut inner = self.0.lock();
        inner.calls.push(SysCall::MakeDir(path.to_path_buf()));
        scripted_err(&inner.make_dir_err)?;
        if inner.nodes.contains_key(path) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "exists"));
        }
        inner.nodes.insert(path.to_path_buf(), Node::Dir);
        Ok(())
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        let mut inner = self.0.lock();
        inner.calls.push(SysCall::RemoveDir(path.to_path_buf()));
        scripted_err(&inner.remove_dir_err)?;
        match inner.nodes.get(path) {
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no such directory")),
            Some(Node::Mount(_)) => Err(io::Error::other("device or resource busy")),
            Some(Node::File) => Err(io::Error::other("not a directory")),
            Some(Node::Dir) => {
                inner.nodes.remove(path);
                Ok(())
            }
        }
    }

    fn unmount(&self, path: &Path) -> io::Result<()> {
        let mut inner = self.0.lock();
        inner.calls.push(SysCall::Unmount(path.to_path_buf()));
        scripted_err(&inner.unmount_err)?;
        match inner.nodes.get(path) {
            Some(Node::Mount(_)) => {
                inner.nodes.insert(path.to_path_buf(), Node::Dir);
                Ok(())
            }
            _ => Err(io::Error::other("not mounted")),
        }
    }
}
