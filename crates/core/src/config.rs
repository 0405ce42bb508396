//! Run configuration: the single record every resolution stage fills in.
//!
//! [`RunConfiguration`] starts out empty and is completed in strict order:
//!
//! 1. CLI flags (highest precedence)
//! 2. Environment variables (`BLACKDUCK_URL`, `BLACKDUCK_API_TOKEN`, `BLACKDUCK_TRUST_CERT`)
//! 3. Values discovered from the Yocto build (`bitbake -e`, deploy directory)
//! 4. Interactive wizard answers
//! 5. Built-in defaults (target, machine)
//!
//! A stage only writes a field that is still empty, so once a higher
//! precedence source has set a value it is never overwritten.
//!
//! # Example
//! ```
//! use std::collections::HashMap;
//! use bd_scan_core::config::{override_string, RunConfiguration, ENV_SERVER_URL};
//!
//! let env = HashMap::from([(ENV_SERVER_URL.to_owned(), "https://bd.example".to_owned())]);
//! let mut config = RunConfiguration::default();
//! override_string(&mut config.server_url, &env, ENV_SERVER_URL);
//! assert_eq!(config.server_url, "https://bd.example");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::PackageType;

/// Black Duck server URL
pub const ENV_SERVER_URL: &str = "BLACKDUCK_URL";
/// Black Duck API token
pub const ENV_API_TOKEN: &str = "BLACKDUCK_API_TOKEN";
/// Trust the server certificate when set to exactly `true`
pub const ENV_TRUST_CERT: &str = "BLACKDUCK_TRUST_CERT";

/// Script sourced before running `bitbake -e`
pub const DEFAULT_BUILD_ENV_SCRIPT: &str = "oe-init-build-env";
/// Yocto image target
pub const DEFAULT_TARGET: &str = "core-image-sato";
/// Machine architecture
pub const DEFAULT_MACHINE: &str = "qemux86_64";

/// Source of environment variables.
///
/// Resolution reads the environment only through this trait so tests can
/// supply a fixed map instead of mutating the process environment.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Resolved settings for one scan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    // --- connection ---
    /// Black Duck server URL
    pub server_url: String,
    /// Black Duck API token
    pub api_token: String,
    /// Trust the server TLS certificate
    pub trust_cert: bool,

    // --- project identity ---
    /// Black Duck project name
    pub project: String,
    /// Black Duck project version name
    pub version: String,

    // --- build context ---
    /// Yocto build environment script (`oe-init-build-env`)
    pub build_env_script: String,
    /// Yocto image target
    pub target: String,
    /// Machine architecture (`MACHINE_ARCH`)
    pub machine: String,

    // --- derived paths ---
    /// `DEPLOY_DIR`
    pub deploy_dir: String,
    /// Original package download folder (`DL_DIR`)
    pub download_dir: String,
    /// rpm / ipk package folder
    pub package_dir: String,
    /// `IMAGE_PKGTYPE`
    pub package_type: Option<PackageType>,
    /// `license.manifest` path
    pub manifest_file: String,
    /// `*rootfs.cve` path
    pub cve_check_file: String,

    // --- scan behaviour ---
    pub skip_detect_for_bitbake: bool,
    pub cve_check: bool,
    pub cve_check_only: bool,
    pub no_cve_check: bool,
    pub snippets: bool,
    pub extended_scan_layers: Vec<String>,
    pub exclude_layers: Vec<String>,
    /// Extra options passed through to Detect
    pub detect_opts: String,
    /// Detect jar override
    pub detect_jar: String,
    /// Skip environment checks
    pub test_mode: bool,
    pub debug: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            api_token: String::new(),
            trust_cert: false,
            project: String::new(),
            version: String::new(),
            build_env_script: DEFAULT_BUILD_ENV_SCRIPT.to_owned(),
            target: String::new(),
            machine: String::new(),
            deploy_dir: String::new(),
            download_dir: String::new(),
            package_dir: String::new(),
            package_type: None,
            manifest_file: String::new(),
            cve_check_file: String::new(),
            skip_detect_for_bitbake: false,
            cve_check: false,
            cve_check_only: false,
            no_cve_check: false,
            snippets: false,
            extended_scan_layers: Vec::new(),
            exclude_layers: Vec::new(),
            detect_opts: String::new(),
            detect_jar: String::new(),
            test_mode: false,
            debug: false,
        }
    }
}

impl RunConfiguration {
    /// Machine name as it appears in deploy paths (`qemux86_64` -> `qemux86-64`).
    pub fn machine_slug(&self) -> String {
        self.machine.replace('_', "-")
    }

    /// Falls back to [`DEFAULT_MACHINE`] when neither the CLI nor the build
    /// environment supplied one.
    pub fn default_machine_if_unset(&mut self) -> bool {
        if self.machine.is_empty() {
            self.machine = DEFAULT_MACHINE.to_owned();
            return true;
        }
        false
    }

    /// Names of fields the wizard exists to fill in that are still empty.
    ///
    /// A non-empty result makes the wizard run unless it was disabled.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.server_url.is_empty() {
            missing.push("server_url");
        }
        if self.api_token.is_empty() {
            missing.push("api_token");
        }
        if self.project.is_empty() {
            missing.push("project");
        }
        if self.version.is_empty() {
            missing.push("version");
        }
        if self.manifest_file.is_empty() {
            missing.push("manifest_file");
        }
        missing
    }

    /// Checks the cross-field CVE rules on the record.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.no_cve_check && !self.cve_check_file.is_empty() {
            return Err(ConfigError::ConflictingOptions {
                first: "cve-check-file".to_owned(),
                second: "no-cve-check".to_owned(),
            });
        }
        if self.no_cve_check && self.cve_check_only {
            return Err(ConfigError::ConflictingOptions {
                first: "cve-check-only".to_owned(),
                second: "no-cve-check".to_owned(),
            });
        }
        Ok(())
    }

    /// Gate before handing the record to the scan phase: project and version
    /// must be known.
    pub fn ensure_ready(&self) -> Result<(), ConfigError> {
        self.validate()?;

        let mut fields = Vec::new();
        if self.project.is_empty() {
            fields.push("project".to_owned());
        }
        if self.version.is_empty() {
            fields.push("version".to_owned());
        }
        if !fields.is_empty() {
            return Err(ConfigError::MissingRequired { fields });
        }
        Ok(())
    }
}

// --- environment override helpers ---

/// Fills `target` from `env_key` when the field is still empty and the
/// variable holds a non-empty value. Returns `true` if the field was set.
pub fn override_string(target: &mut String, env: &dyn EnvSource, env_key: &str) -> bool {
    if !target.is_empty() {
        return false;
    }
    match env.var(env_key) {
        Some(val) if !val.is_empty() => {
            *target = val;
            true
        }
        _ => false,
    }
}

/// Raises `target` when `env_key` is exactly `true`. Any other value,
/// including `TRUE` or `1`, leaves the flag untouched.
pub fn override_flag(target: &mut bool, env: &dyn EnvSource, env_key: &str) -> bool {
    if *target {
        return false;
    }
    if env.var(env_key).as_deref() == Some("true") {
        *target = true;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn default_config_is_empty_apart_from_script() {
        let config = RunConfiguration::default();
        assert_eq!(config.build_env_script, DEFAULT_BUILD_ENV_SCRIPT);
        assert!(config.server_url.is_empty());
        assert!(config.target.is_empty());
        assert!(config.machine.is_empty());
        assert!(config.package_type.is_none());
        assert!(!config.trust_cert);
        assert!(!config.cve_check);
        assert!(config.extended_scan_layers.is_empty());
    }

    #[test]
    fn machine_slug_replaces_underscores() {
        let config = RunConfiguration {
            machine: "qemux86_64".to_owned(),
            ..Default::default()
        };
        assert_eq!(config.machine_slug(), "qemux86-64");
    }

    #[test]
    fn default_machine_only_fills_empty() {
        let mut config = RunConfiguration::default();
        assert!(config.default_machine_if_unset());
        assert_eq!(config.machine, DEFAULT_MACHINE);

        let mut config = RunConfiguration {
            machine: "raspberrypi4".to_owned(),
            ..Default::default()
        };
        assert!(!config.default_machine_if_unset());
        assert_eq!(config.machine, "raspberrypi4");
    }

    #[test]
    fn missing_required_lists_empty_fields_in_order() {
        let config = RunConfiguration {
            server_url: "https://bd".to_owned(),
            project: "proj".to_owned(),
            ..Default::default()
        };
        assert_eq!(
            config.missing_required(),
            vec!["api_token", "version", "manifest_file"]
        );
    }

    #[test]
    fn validate_rejects_cve_file_with_no_cve_check() {
        let config = RunConfiguration {
            cve_check_file: "/tmp/x.cve".to_owned(),
            no_cve_check: true,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cve-check-file"));
    }

    #[test]
    fn validate_rejects_cve_only_with_no_cve_check() {
        let config = RunConfiguration {
            cve_check_only: true,
            no_cve_check: true,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ConflictingOptions { .. })
        ));
    }

    #[test]
    fn ensure_ready_requires_project_and_version() {
        let config = RunConfiguration {
            project: "proj".to_owned(),
            ..Default::default()
        };
        match config.ensure_ready() {
            Err(ConfigError::MissingRequired { fields }) => assert_eq!(fields, vec!["version"]),
            other => panic!("expected MissingRequired, got {other:?}"),
        }

        let config = RunConfiguration {
            project: "proj".to_owned(),
            version: "1.0".to_owned(),
            ..Default::default()
        };
        config.ensure_ready().unwrap();
    }

    #[test]
    fn override_string_fills_empty_field() {
        let env = env_of(&[(ENV_SERVER_URL, "https://from-env")]);
        let mut val = String::new();
        assert!(override_string(&mut val, &env, ENV_SERVER_URL));
        assert_eq!(val, "https://from-env");
    }

    #[test]
    fn override_string_never_replaces_existing_value() {
        let env = env_of(&[(ENV_SERVER_URL, "https://from-env")]);
        let mut val = "https://from-cli".to_owned();
        assert!(!override_string(&mut val, &env, ENV_SERVER_URL));
        assert_eq!(val, "https://from-cli");
    }

    #[test]
    fn override_string_ignores_empty_env_value() {
        let env = env_of(&[(ENV_API_TOKEN, "")]);
        let mut val = String::new();
        assert!(!override_string(&mut val, &env, ENV_API_TOKEN));
        assert!(val.is_empty());
    }

    #[test]
    fn override_flag_only_accepts_literal_true() {
        for (raw, expected) in [("true", true), ("TRUE", false), ("1", false), ("yes", false)] {
            let env = env_of(&[(ENV_TRUST_CERT, raw)]);
            let mut val = false;
            override_flag(&mut val, &env, ENV_TRUST_CERT);
            assert_eq!(val, expected, "value {raw:?}");
        }
    }

    #[test]
    fn override_flag_keeps_cli_true() {
        let env = env_of(&[(ENV_TRUST_CERT, "false")]);
        let mut val = true;
        assert!(!override_flag(&mut val, &env, ENV_TRUST_CERT));
        assert!(val);
    }

    #[test]
    #[serial]
    fn process_env_reads_real_environment() {
        // SAFETY: serialised with every other test touching the process environment.
        unsafe { std::env::set_var("TEST_BD_SCAN_PROCESS_ENV", "value") };
        assert_eq!(
            ProcessEnv.var("TEST_BD_SCAN_PROCESS_ENV").as_deref(),
            Some("value")
        );
        unsafe { std::env::remove_var("TEST_BD_SCAN_PROCESS_ENV") };
        assert!(ProcessEnv.var("TEST_BD_SCAN_PROCESS_ENV").is_none());
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = RunConfiguration {
            package_type: Some(PackageType::Ipk),
            extended_scan_layers: vec!["meta-oe".to_owned()],
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"package_type\":\"ipk\""));
        let parsed: RunConfiguration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
