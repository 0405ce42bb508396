//! Build environment error types
//!
//! [`BuildEnvError`] covers everything that can go wrong while introspecting
//! the Yocto build. `From<BuildEnvError> for BdScanError` lets callers
//! propagate it with `?`.
//!
//! Only [`BuildEnvError::Spawn`] and [`BuildEnvError::EmptyDump`] are fatal
//! for a run; discovery errors are downgraded to warnings by
//! [`discover`](crate::discovery::discover).

use bd_scan_core::error::{BdScanError, BuildEnvFailure};

/// Build environment domain error
#[derive(Debug, thiserror::Error)]
pub enum BuildEnvError {
    /// The shell running the dump command could not be started
    #[error("failed to run '{command}': {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The dump command ran but wrote nothing to stdout
    #[error("'{command}' produced no output")]
    EmptyDump {
        /// Command line that was run
        command: String,
    },

    /// A discovery glob could not be compiled
    #[error("invalid glob pattern '{pattern}': {reason}")]
    Pattern {
        /// Pattern text
        pattern: String,
        /// Compile error
        reason: String,
    },

    /// Filesystem error while scanning the deploy tree
    #[error("io error: {path}: {source}")]
    Io {
        /// Path being read
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl From<BuildEnvError> for BdScanError {
    fn from(err: BuildEnvError) -> Self {
        match err {
            BuildEnvError::Spawn { command, source } => BdScanError::BuildEnv(
                BuildEnvFailure::CaptureFailed(format!("failed to run '{command}': {source}")),
            ),
            BuildEnvError::EmptyDump { command } => {
                BdScanError::BuildEnv(BuildEnvFailure::EmptyDump(command))
            }
            BuildEnvError::Pattern { pattern, reason } => BdScanError::BuildEnv(
                BuildEnvFailure::DiscoveryFailed(format!("invalid glob pattern '{pattern}': {reason}")),
            ),
            BuildEnvError::Io { path, source } => BdScanError::BuildEnv(
                BuildEnvFailure::DiscoveryFailed(format!("io error: {path}: {source}")),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dump_display_names_command() {
        let err = BuildEnvError::EmptyDump {
            command: "bash -c 'source oe-init-build-env; bitbake -e'".to_owned(),
        };
        assert!(err.to_string().contains("bitbake -e"));
        assert!(err.to_string().contains("no output"));
    }

    #[test]
    fn spawn_error_display() {
        let err = BuildEnvError::Spawn {
            command: "bash".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("bash"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn converts_empty_dump() {
        let err = BuildEnvError::EmptyDump {
            command: "bitbake -e".to_owned(),
        };
        let top: BdScanError = err.into();
        assert!(matches!(
            top,
            BdScanError::BuildEnv(BuildEnvFailure::EmptyDump(_))
        ));
    }

    #[test]
    fn converts_spawn_to_capture_failed() {
        let err = BuildEnvError::Spawn {
            command: "bash".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let top: BdScanError = err.into();
        assert!(matches!(
            top,
            BdScanError::BuildEnv(BuildEnvFailure::CaptureFailed(_))
        ));
    }

    #[test]
    fn converts_io_to_discovery_failed() {
        let err = BuildEnvError::Io {
            path: "/deploy/images".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let top: BdScanError = err.into();
        assert!(matches!(
            top,
            BdScanError::BuildEnv(BuildEnvFailure::DiscoveryFailed(_))
        ));
    }
}
