use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::Credentials;
use tracing::debug;

use super::{Mounter, MounterError};
use crate::exec::{CapturedOutput, Invocation, Runner};

/// Substring of `s3fs --version` output that identifies a working binary.
const VERSION_MARKER: &str = "Amazon Simple Storage Service File System";

/// Backend driving the [s3fs-fuse] helper.
///
/// [s3fs-fuse]: https://github.com/s3fs-fuse/s3fs-fuse
pub struct S3fs {
    binary: PathBuf,
    runner: Arc<dyn Runner>,
}

impl S3fs {
    pub const NAME: &'static str = "s3fs";
    /// Filesystem type s3fs mounts appear as in the mount table.
    pub const FS_TYPE: &'static str = "fuse.s3fs";

    pub fn new(binary: impl Into<PathBuf>, runner: Arc<dyn Runner>) -> Self {
        Self {
            binary: binary.into(),
            runner,
        }
    }

    fn helper_failed(&self, output: &CapturedOutput) -> MounterError {
        MounterError::HelperFailed {
            program: self.binary.display().to_string(),
            exit_code: output.exit_code,
            stderr: output.stderr.trim_end().to_string(),
        }
    }
}

impl Mounter for S3fs {
    fn is_ready(&self) -> Result<bool, MounterError> {
        let output = self
            .runner
            .run(&Invocation::new(&self.binary).arg("--version"))?;
        if !output.success() {
            return Err(self.helper_failed(&output));
        }
        if !output.stdout.contains(VERSION_MARKER) {
            return Err(MounterError::UnexpectedVersionOutput {
                program: self.binary.display().to_string(),
                stdout: output.stdout.clone(),
            });
        }
        Ok(true)
    }

    fn mount(
        &self,
        target: &Path,
        bucket: &str,
        credentials: &Credentials,
        read_only: bool,
    ) -> Result<(), MounterError> {
        debug!(bucket, target = %target.display(), read_only, "invoking s3fs");
        let mut invocation = Invocation::new(&self.binary).arg(bucket).arg(target);
        if read_only {
            invocation = invocation.arg("-o").arg("ro");
        }
        let [(key_name, key), (secret_name, secret)] = credentials.env_pairs();
        invocation = invocation.env(key_name, key).env(secret_name, secret);

        let output = self.runner.run(&invocation)?;
        if !output.success() {
            return Err(self.helper_failed(&output));
        }
        Ok(())
    }

    fn fs_type(&self) -> &str {
        Self::FS_TYPE
    }
}
