//! Subprocess execution for mount helpers.
//!
//! The node service never shells out directly; it goes through the
//! [`Runner`] trait so the mount backends can be exercised in tests with
//! scripted exit codes and output instead of real processes.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Command;

/// One helper invocation: program, arguments, and extra environment.
///
/// The child inherits the daemon's environment; `env` entries are added on
/// top. Credentials travel here and never in `args`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// True when any argument equals `needle`. Used by tests to prove
    /// secrets stay out of argv.
    pub fn has_arg(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a == needle)
    }
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The process could not be started or its pipes could not be set up.
    /// Distinct from a non-zero exit: there is no stderr to report here.
    #[error("failed starting {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

pub trait Runner: Send + Sync {
    /// Run the invocation to completion and capture its output.
    fn run(&self, invocation: &Invocation) -> Result<CapturedOutput, ExecError>;
}

/// Executes real processes.
///
/// Both output streams are read to EOF before the exit status is collected
/// (`Command::output` semantics), so a child filling a pipe buffer cannot
/// deadlock against our `wait`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CapturedOutput, ExecError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }
        let output = cmd.output().map_err(|source| ExecError::Spawn {
            program: invocation.program.display().to_string(),
            source,
        })?;
        Ok(CapturedOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

pub mod fake {
    //! Scripted [`Runner`] double for tests.

    use std::collections::VecDeque;

    use parking_lot::Mutex;

    use super::{CapturedOutput, ExecError, Invocation, Runner};

    enum Scripted {
        Output(CapturedOutput),
        SpawnFailure(String),
    }

    /// Replays queued results in order and records every invocation so
    /// tests can assert on argv and environment.
    #[derive(Default)]
    pub struct ScriptedRunner {
        results: Mutex<VecDeque<Scripted>>,
        calls: Mutex<Vec<Invocation>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_output(&self, exit_code: i32, stdout: &str, stderr: &str) {
            self.results
                .lock()
                .push_back(Scripted::Output(CapturedOutput {
                    exit_code: Some(exit_code),
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                }));
        }

        pub fn push_success(&self, stdout: &str) {
            self.push_output(0, stdout, "");
        }

        pub fn push_spawn_failure(&self, message: &str) {
            self.results
                .lock()
                .push_back(Scripted::SpawnFailure(message.to_string()));
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().clone()
        }
    }

    impl Runner for ScriptedRunner {
        fn run(&self, invocation: &Invocation) -> Result<CapturedOutput, ExecError> {
            self.calls.lock().push(invocation.clone());
            match self.results.lock().pop_front() {
                Some(Scripted::Output(output)) => Ok(output),
                Some(Scripted::SpawnFailure(message)) => Err(ExecError::Spawn {
                    program: invocation.program.display().to_string(),
                    source: std::io::Error::other(message),
                }),
                None => panic!(
                    "no scripted result left for {}",
                    invocation.program.display()
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_stderr_and_exit_code() {
        let inv = Invocation::new("/bin/sh")
            .arg("-c")
            .arg("echo out; echo err >&2; exit 3");
        let out = SystemRunner.run(&inv).unwrap();
        assert_eq!(out.exit_code, Some(3));
        assert!(!out.success());
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[test]
    fn passes_extra_environment() {
        let inv = Invocation::new("/bin/sh")
            .arg("-c")
            .arg("printf '%s' \"$S3CSI_TEST_VAR\"")
            .env("S3CSI_TEST_VAR", "hello");
        let out = SystemRunner.run(&inv).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "hello");
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let inv = Invocation::new("/nonexistent/s3csi-test-binary");
        let err = SystemRunner.run(&inv).unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[test]
    fn scripted_runner_replays_in_order_and_records_calls() {
        let runner = fake::ScriptedRunner::new();
        runner.push_success("first");
        runner.push_output(1, "", "boom");

        let a = Invocation::new("helper").arg("--version");
        let b = Invocation::new("helper").arg("bucket");
        assert_eq!(runner.run(&a).unwrap().stdout, "first");
        let second = runner.run(&b).unwrap();
        assert_eq!(second.exit_code, Some(1));
        assert_eq!(second.stderr, "boom");

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].has_arg("--version"));
        assert!(calls[1].has_arg("bucket"));
    }
}
