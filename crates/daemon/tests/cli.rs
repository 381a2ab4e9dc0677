use assert_cmd::Command;
use predicates::prelude::*;

fn s3csi() -> Command {
    Command::cargo_bin("s3csi").unwrap()
}

// --- --help ---

#[test]
fn help_exits_zero() {
    s3csi().arg("--help").assert().success();
}

#[test]
fn help_lists_subcommands() {
    s3csi()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("unpublish"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn serve_help_shows_configuration_surface() {
    s3csi()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--node-id"))
        .stdout(predicate::str::contains("--mounter"))
        .stdout(predicate::str::contains("--mounter-binary-path"));
}

// --- version ---

#[test]
fn version_prints_build_info() {
    s3csi()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("built"));
}

// --- error paths that must not require a daemon ---

#[test]
fn serve_rejects_unknown_mounter() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("csi.sock");
    s3csi()
        .args([
            "serve",
            "--mounter",
            "nfs",
            "--csi-address",
            socket.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown mounter"));
}

#[test]
fn probe_fails_cleanly_without_a_daemon() {
    s3csi()
        .args(["probe", "--csi-address", "/nonexistent/dir/csi.sock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not connect"));
}
