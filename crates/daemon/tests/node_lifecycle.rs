//! Node lifecycle against the real filesystem.
//!
//! The mount helper is faked (real FUSE mounts need privileges), but
//! directory handling and mount-table inspection run against the actual
//! OS: target paths live in a tempdir and `/proc/self/mounts` is the real
//! table, which never lists them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use s3csi_daemon::fs::Fs;
use s3csi_daemon::mounter::fake::FakeMounter;
use s3csi_daemon::node::{NodeMounts, PublishParams, Published};

fn secrets() -> HashMap<String, String> {
    [
        ("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", "sekrit"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn params(target: &Path) -> PublishParams {
    PublishParams {
        volume_id: "my-bucket".to_string(),
        target_path: target.to_path_buf(),
        read_only: false,
        secrets: secrets(),
    }
}

fn node(mounter: &FakeMounter) -> NodeMounts {
    NodeMounts::new(Fs::default(), Arc::new(mounter.clone()), Some("node-1".into()))
}

#[test]
fn publish_creates_directory_and_invokes_helper() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("volume");
    let mounter = FakeMounter::new("fuse.s3fs");

    let outcome = node(&mounter).publish_blocking(&params(&target)).unwrap();
    assert_eq!(outcome, Published::Mounted);
    assert!(target.is_dir());

    let calls = mounter.mount_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].bucket, "my-bucket");
    assert_eq!(calls[0].target, target);
}

#[test]
fn publish_retries_when_mount_never_appeared() {
    // the helper "succeeded" but its mount is not in the table, e.g. it
    // died right after daemonizing; a retry must attempt the mount again
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("volume");
    let mounter = FakeMounter::new("fuse.s3fs");
    let n = node(&mounter);

    assert_eq!(n.publish_blocking(&params(&target)).unwrap(), Published::Mounted);
    assert_eq!(n.publish_blocking(&params(&target)).unwrap(), Published::Mounted);
    assert_eq!(mounter.mount_calls().len(), 2);
    assert!(target.is_dir(), "existing directory must be reused, not an error");
}

#[test]
fn publish_rejects_file_at_target_without_running_helper() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("volume");
    std::fs::write(&target, b"in the way").unwrap();
    let mounter = FakeMounter::new("fuse.s3fs");

    assert!(node(&mounter).publish_blocking(&params(&target)).is_err());
    assert!(mounter.mount_calls().is_empty());
    assert!(target.is_file(), "the offending file is left for an operator");
}

#[test]
fn unpublish_removes_leftover_directory() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("volume");
    std::fs::create_dir(&target).unwrap();
    let mounter = FakeMounter::new("fuse.s3fs");

    node(&mounter).unpublish_blocking(&target).unwrap();
    assert!(!target.exists());
}

#[test]
fn unpublish_is_idempotent_on_absent_path() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("never-created");
    let mounter = FakeMounter::new("fuse.s3fs");
    let n = node(&mounter);

    n.unpublish_blocking(&target).unwrap();
    n.unpublish_blocking(&target).unwrap();
}

#[test]
fn full_cycle_leaves_no_trace() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("volume");
    let mounter = FakeMounter::new("fuse.s3fs");
    let n = node(&mounter);

    n.publish_blocking(&params(&target)).unwrap();
    assert!(target.is_dir());
    n.unpublish_blocking(&target).unwrap();
    assert!(!target.exists());
}
