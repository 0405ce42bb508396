//! Building the run configuration from flags and environment
//!
//! This is the first and highest-precedence stage: anything given on the
//! command line or in the environment lands here, and later stages only
//! fill what is left empty. It never prompts.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::{debug, warn};

use bd_scan_core::config::{
    DEFAULT_TARGET, ENV_API_TOKEN, ENV_SERVER_URL, ENV_TRUST_CERT, EnvSource, RunConfiguration,
    override_flag, override_string,
};
use bd_scan_core::error::ConfigError;

use crate::cli::Cli;
use crate::error::CliError;

/// Resolves CLI flags and environment variables into a [`RunConfiguration`].
///
/// # Errors
///
/// Conflicting CVE options, a missing build environment script or `java`
/// (outside test mode), and a missing Detect jar are fatal. Any other
/// unusable path is dropped with a warning.
pub fn resolve(cli: &Cli, env: &dyn EnvSource) -> Result<RunConfiguration, CliError> {
    let cve_check_file = non_empty(&cli.cve_check_file);
    if cli.no_cve_check && cve_check_file.is_some() {
        return Err(conflict("cve-check-file", "no-cve-check"));
    }
    if cli.cve_check_only && cli.no_cve_check {
        return Err(conflict("cve-check-only", "no-cve-check"));
    }

    let mut config = RunConfiguration {
        build_env_script: cli.oe_build_env.clone(),
        test_mode: cli.testmode,
        debug: cli.debug,
        ..Default::default()
    };

    if !config.test_mode {
        preflight(&config.build_env_script, env)?;
    }

    if let Some(url) = non_empty(&cli.blackduck_url) {
        config.server_url = url.to_owned();
    } else if !override_string(&mut config.server_url, env, ENV_SERVER_URL) {
        warn!("Black Duck URL not specified");
    }

    let (project, version) = (non_empty(&cli.project), non_empty(&cli.version));
    config.project = project.unwrap_or_default().to_owned();
    config.version = version.unwrap_or_default().to_owned();
    if project.is_none() || version.is_none() {
        warn!("Black Duck project/version not specified");
    }

    if let Some(token) = non_empty(&cli.blackduck_api_token) {
        config.api_token = token.to_owned();
    } else if !override_string(&mut config.api_token, env, ENV_API_TOKEN) {
        warn!("Black Duck API token not specified");
    }

    config.trust_cert = cli.blackduck_trust_cert;
    override_flag(&mut config.trust_cert, env, ENV_TRUST_CERT);

    if let Some(dir) = non_empty(&cli.download_dir) {
        config.download_dir = existing_dir(dir, "download package folder");
    }
    if let Some(dir) = non_empty(&cli.rpm_dir) {
        config.package_dir = existing_dir(dir, "download rpm folder");
    }

    config.cve_check_only = cli.cve_check_only;
    config.no_cve_check = cli.no_cve_check;
    config.cve_check = cli.cve_check_only || cve_check_file.is_some();
    if let Some(file) = cve_check_file {
        config.cve_check_file = existing_file(file, "CVE check output file");
    }

    if let Some(manifest) = non_empty(&cli.manifest) {
        config.manifest_file = existing_file(manifest, "manifest file");
    }

    if let Some(machine) = non_empty(&cli.machine) {
        config.machine = machine.to_owned();
    }

    if let Some(jar) = non_empty(&cli.detect_jar_path) {
        if !Path::new(jar).is_file() {
            return Err(ConfigError::DetectJarNotFound {
                path: jar.to_owned(),
            }
            .into());
        }
        config.detect_jar = jar.to_owned();
    }

    config.target = cli
        .target
        .clone()
        .unwrap_or_else(|| DEFAULT_TARGET.to_owned());

    config.skip_detect_for_bitbake = cli.skip_detect_for_bitbake;
    config.snippets = cli.snippets;
    config.extended_scan_layers = split_layers(&cli.extended_scan_layers);
    config.exclude_layers = split_layers(&cli.exclude_layers);
    config.detect_opts = cli.detect_opts.clone().unwrap_or_default();

    debug!(
        server_url = %config.server_url,
        project = %config.project,
        version = %config.version,
        target = %config.target,
        machine = %config.machine,
        "resolved command line and environment"
    );
    Ok(config)
}

/// Runtime prerequisites: the build environment script and a `java` on `PATH`.
fn preflight(script: &str, env: &dyn EnvSource) -> Result<(), CliError> {
    if !Path::new(script).is_file() {
        return Err(ConfigError::BuildEnvScriptNotFound {
            path: script.to_owned(),
        }
        .into());
    }
    if !on_path("java", env) {
        return Err(ConfigError::JavaNotFound.into());
    }
    Ok(())
}

/// Whether `program` is an executable file in one of the `PATH` directories.
fn on_path(program: &str, env: &dyn EnvSource) -> bool {
    let Some(path) = env.var("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| {
        std::fs::metadata(dir.join(program))
            .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
    })
}

fn conflict(first: &str, second: &str) -> CliError {
    ConfigError::ConflictingOptions {
        first: first.to_owned(),
        second: second.to_owned(),
    }
    .into()
}

fn non_empty(val: &Option<String>) -> Option<&str> {
    val.as_deref().filter(|v| !v.is_empty())
}

/// Absolute path of an existing directory, or empty with a warning.
fn existing_dir(dir: &str, what: &str) -> String {
    if !Path::new(dir).is_dir() {
        warn!(path = dir, "specified {what} does not exist");
        return String::new();
    }
    match std::path::absolute(dir) {
        Ok(abs) => abs.display().to_string(),
        Err(e) => {
            debug!(path = dir, error = %e, "could not make path absolute");
            dir.to_owned()
        }
    }
}

/// The path when it names an existing file, or empty with a warning.
fn existing_file(file: &str, what: &str) -> String {
    if Path::new(file).is_file() {
        file.to_owned()
    } else {
        warn!(path = file, "{what} does not exist");
        String::new()
    }
}

fn split_layers(val: &Option<String>) -> Vec<String> {
    non_empty(val)
        .map(|v| v.split(',').map(str::to_owned).collect())
        .unwrap_or_default()
}
