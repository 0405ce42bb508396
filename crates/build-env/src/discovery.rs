//! Locating build artifacts in the deploy tree
//!
//! - `license.manifest`: `<deploy>/licenses/<target>-<machine>-*/license.manifest`
//! - CVE report: `<deploy>/images/<machine>/<target>-<machine>-*rootfs.cve`
//!
//! `<machine>` is the machine name with `_` replaced by `-`. When several
//! builds match, the lexicographically last path is chosen; with date-stamped
//! build directories that is the newest build. Matches are sorted explicitly
//! because directory order is not guaranteed.

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, info, warn};

use bd_scan_core::config::RunConfiguration;

use crate::error::BuildEnvError;

/// File name of the license manifest
pub const MANIFEST_FILE_NAME: &str = "license.manifest";
/// Suffix of the per-image CVE report
pub const CVE_FILE_SUFFIX: &str = "rootfs.cve";

/// What [`discover`] filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    /// Manifest path set by discovery
    pub manifest_file: Option<PathBuf>,
    /// CVE report path set by discovery
    pub cve_check_file: Option<PathBuf>,
}

/// Glob pattern for the license manifest of the configured target/machine.
pub fn manifest_pattern(config: &RunConfiguration) -> String {
    let build_dir = format!(
        "{}-{}-*",
        Pattern::escape(&config.target),
        Pattern::escape(&config.machine_slug())
    );
    Path::new(&Pattern::escape(&config.deploy_dir))
        .join("licenses")
        .join(build_dir)
        .join(MANIFEST_FILE_NAME)
        .to_string_lossy()
        .into_owned()
}

/// Finds the lexicographically last existing manifest for the target.
pub fn find_manifest(config: &RunConfiguration) -> Result<Option<PathBuf>, BuildEnvError> {
    let pattern = manifest_pattern(config);
    let paths = glob::glob(&pattern).map_err(|e| BuildEnvError::Pattern {
        pattern: pattern.clone(),
        reason: e.to_string(),
    })?;

    let mut matches: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(error = %e, "unreadable glob entry, skipping");
                None
            }
        })
        .collect();
    matches.sort();
    debug!(pattern = %pattern, matches = matches.len(), "manifest candidates");

    Ok(matches.pop().filter(|path| path.is_file()))
}

/// Finds the lexicographically last CVE report for the target.
pub fn find_cve_file(config: &RunConfiguration) -> Result<Option<PathBuf>, BuildEnvError> {
    let machine = config.machine_slug();
    let image_dir = Path::new(&config.deploy_dir).join("images").join(&machine);
    let prefix = format!("{}-{}-", config.target, machine);

    let entries = std::fs::read_dir(&image_dir).map_err(|source| BuildEnvError::Io {
        path: image_dir.display().to_string(),
        source,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => entry.file_name().into_string().ok(),
            Err(e) => {
                debug!(error = %e, "failed to read directory entry");
                None
            }
        })
        .collect();
    names.sort();

    let selected = names
        .iter()
        .filter(|name| name.starts_with(&prefix) && name.ends_with(CVE_FILE_SUFFIX))
        .last()
        .map(|name| image_dir.join(name));

    Ok(selected.filter(|path| path.is_file()))
}

/// Fills in the manifest and CVE report paths that are still empty.
///
/// Best effort: every failure is logged as a warning and leaves the field
/// empty. Locating a CVE report also turns on `cve_check`.
pub fn discover(config: &mut RunConfiguration) -> DiscoveryOutcome {
    let mut outcome = DiscoveryOutcome::default();

    if config.manifest_file.is_empty() {
        if config.target.is_empty() {
            warn!("manifest file not specified and it could not be determined as target not specified");
        } else {
            match find_manifest(config) {
                Ok(Some(path)) => {
                    info!(path = %path.display(), "located license.manifest file");
                    config.manifest_file = path.display().to_string();
                    outcome.manifest_file = Some(path);
                }
                Ok(None) => warn!(
                    pattern = %manifest_pattern(config),
                    "manifest file could not be located"
                ),
                Err(e) => warn!(error = %e, "manifest file could not be located"),
            }
        }
    }

    if config.cve_check_file.is_empty() {
        if config.no_cve_check {
            debug!("CVE check disabled, not looking for a CVE report");
        } else if config.target.is_empty() {
            warn!("CVE check file not specified and it could not be determined as target not specified");
        } else {
            match find_cve_file(config) {
                Ok(Some(path)) => {
                    info!(path = %path.display(), "located CVE check output file");
                    config.cve_check_file = path.display().to_string();
                    config.cve_check = true;
                    outcome.cve_check_file = Some(path);
                }
                Ok(None) => warn!(
                    machine = %config.machine_slug(),
                    "CVE check file could not be located"
                ),
                Err(e) => warn!(error = %e, "CVE check file could not be located"),
            }
        }
    }

    outcome
}
