//! Error types shared by every stage of configuration resolution.
//!
//! Every variant here is fatal for the run: warnings never become errors,
//! they are logged at the call site and the affected field stays empty.

/// Top-level error for `bd-scan-yocto`.
#[derive(Debug, thiserror::Error)]
pub enum BdScanError {
    /// Configuration validation error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Build environment introspection error
    #[error("build environment error: {0}")]
    BuildEnv(#[from] BuildEnvFailure),
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The Yocto build environment script does not exist
    #[error("cannot find Yocto build environment config file '{path}'")]
    BuildEnvScriptNotFound { path: String },

    /// No `java` executable on `PATH`
    #[error("java runtime is required and should be on the PATH")]
    JavaNotFound,

    /// Two options that exclude each other were both given
    #[error("options --{first} and --{second} cannot be specified together")]
    ConflictingOptions { first: String, second: String },

    /// The Detect jar override does not exist
    #[error("detect jar file '{path}' does not exist")]
    DetectJarNotFound { path: String },

    /// Fields that must be set before the scan phase are still empty
    #[error("required configuration missing: {}", .fields.join(", "))]
    MissingRequired { fields: Vec<String> },
}

/// Summary of build environment failures, as seen from outside the
/// `bd-scan-build-env` crate.
#[derive(Debug, thiserror::Error)]
pub enum BuildEnvFailure {
    /// The environment dump command could not be run
    #[error("capture failed: {0}")]
    CaptureFailed(String),

    /// The environment dump command produced no output
    #[error("empty environment dump: {0}")]
    EmptyDump(String),

    /// Artifact discovery hit an unrecoverable problem
    #[error("discovery failed: {0}")]
    DiscoveryFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicting_options_display_names_both_flags() {
        let err = ConfigError::ConflictingOptions {
            first: "cve-check-only".to_owned(),
            second: "no-cve-check".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("--cve-check-only"));
        assert!(msg.contains("--no-cve-check"));
    }

    #[test]
    fn missing_required_display_lists_fields() {
        let err = ConfigError::MissingRequired {
            fields: vec!["project".to_owned(), "version".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "required configuration missing: project, version"
        );
    }

    #[test]
    fn build_env_script_not_found_display() {
        let err = ConfigError::BuildEnvScriptNotFound {
            path: "oe-init-build-env".to_owned(),
        };
        assert!(err.to_string().contains("oe-init-build-env"));
    }

    #[test]
    fn config_error_converts_to_top_level() {
        let err: BdScanError = ConfigError::JavaNotFound.into();
        assert!(matches!(err, BdScanError::Config(ConfigError::JavaNotFound)));
        assert!(err.to_string().starts_with("config error:"));
    }

    #[test]
    fn build_env_failure_converts_to_top_level() {
        let err: BdScanError = BuildEnvFailure::EmptyDump("bitbake -e".to_owned()).into();
        assert!(matches!(
            err,
            BdScanError::BuildEnv(BuildEnvFailure::EmptyDump(_))
        ));
        assert!(err.to_string().contains("bitbake -e"));
    }
}
