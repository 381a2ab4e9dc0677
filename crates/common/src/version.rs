//! Build metadata reporting.
//!
//! The [`build_info!`] macro expands in the *calling* crate so that
//! `CARGO_PKG_VERSION` and the `BUILD_*` env vars stamped by that crate's
//! build script are the ones reported.

use std::fmt;

/// Version and build-time information for a binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub features: &'static str,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (built {}, features: {})",
            self.version, self.build_timestamp, self.features
        )
    }
}

/// Construct a [`BuildInfo`] from the calling crate's compile environment.
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::version::BuildInfo {
            version: env!("CARGO_PKG_VERSION"),
            build_timestamp: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
            features: option_env!("BUILD_FEATURES").unwrap_or("none"),
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn display_includes_version_and_timestamp() {
        let info = crate::build_info!();
        let rendered = info.to_string();
        assert!(rendered.contains(env!("CARGO_PKG_VERSION")), "got: {rendered}");
        assert!(rendered.contains("built"), "got: {rendered}");
    }
}
