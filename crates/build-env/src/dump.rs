//! `bitbake -e` dump parsing
//!
//! [`parse_dump`] is a pure function over the captured text. It only looks at
//! `KEY=value` lines whose key is one of [`RECOGNIZED_KEYS`]; every other line
//! (comments, `export` lines, unrelated variables) is ignored. For each key
//! the first occurrence wins.
//!
//! [`EnvDump::apply`] then copies the bindings into a
//! [`RunConfiguration`], never touching a field that already holds a value.

use std::path::Path;

use tracing::{debug, info, warn};

use bd_scan_core::config::RunConfiguration;
use bd_scan_core::types::PackageType;

/// Variables read from the dump.
pub const RECOGNIZED_KEYS: [&str; 7] = [
    "MANIFEST_FILE",
    "DEPLOY_DIR",
    "MACHINE_ARCH",
    "DL_DIR",
    "DEPLOY_DIR_RPM",
    "DEPLOY_DIR_IPK",
    "IMAGE_PKGTYPE",
];

/// Partial bindings recovered from a `bitbake -e` dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDump {
    pub manifest_file: Option<String>,
    pub deploy_dir: Option<String>,
    pub machine_arch: Option<String>,
    pub dl_dir: Option<String>,
    pub deploy_dir_rpm: Option<String>,
    pub deploy_dir_ipk: Option<String>,
    pub image_pkgtype: Option<String>,
}

/// Parses a captured dump. Never fails: unknown lines are skipped.
pub fn parse_dump(raw: &str) -> EnvDump {
    let mut dump = EnvDump::default();

    for line in raw.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let slot = match key {
            "MANIFEST_FILE" => &mut dump.manifest_file,
            "DEPLOY_DIR" => &mut dump.deploy_dir,
            "MACHINE_ARCH" => &mut dump.machine_arch,
            "DL_DIR" => &mut dump.dl_dir,
            "DEPLOY_DIR_RPM" => &mut dump.deploy_dir_rpm,
            "DEPLOY_DIR_IPK" => &mut dump.deploy_dir_ipk,
            "IMAGE_PKGTYPE" => &mut dump.image_pkgtype,
            _ => continue,
        };

        if slot.is_none() {
            *slot = Some(value.trim_matches('"').to_owned());
        }
    }

    dump
}

impl EnvDump {
    /// True when none of the recognized keys appeared.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The package type selector, if it names a known format.
    pub fn package_type(&self) -> Option<PackageType> {
        self.image_pkgtype
            .as_deref()
            .and_then(PackageType::from_str_loose)
    }

    /// Package directory matching `package_type`: the RPM directory for
    /// `rpm`, the IPK directory for `ipk`, nothing otherwise.
    pub fn package_dir_for(&self, package_type: Option<PackageType>) -> Option<&str> {
        match package_type {
            Some(PackageType::Rpm) => self.deploy_dir_rpm.as_deref(),
            Some(PackageType::Ipk) => self.deploy_dir_ipk.as_deref(),
            _ => None,
        }
    }

    /// Copies the bindings into `config`, filling only empty fields.
    pub fn apply(&self, config: &mut RunConfiguration) {
        fill(&mut config.deploy_dir, self.deploy_dir.as_deref(), "deploy_dir");
        fill(&mut config.machine, self.machine_arch.as_deref(), "machine");
        fill(&mut config.download_dir, self.dl_dir.as_deref(), "download_dir");

        if let Some(manifest) = self.manifest_file.as_deref() {
            if config.manifest_file.is_empty() {
                if Path::new(manifest).is_file() {
                    config.manifest_file = manifest.to_owned();
                    info!(manifest_file = manifest, "bitbake env: manifest file");
                } else {
                    debug!(
                        path = manifest,
                        "MANIFEST_FILE does not name an existing file, leaving it to discovery"
                    );
                }
            }
        }

        if config.package_type.is_none() {
            if let Some(raw) = self.image_pkgtype.as_deref() {
                match PackageType::from_str_loose(raw) {
                    Some(pkg) => {
                        config.package_type = Some(pkg);
                        info!(image_pkgtype = %pkg, "bitbake env: package type");
                    }
                    None => warn!(value = raw, "unrecognised IMAGE_PKGTYPE, ignoring"),
                }
            }
        }

        if config.package_dir.is_empty() {
            if let Some(dir) = self.package_dir_for(config.package_type) {
                config.package_dir = dir.to_owned();
                info!(package_dir = dir, "bitbake env: package dir");
            }
        }
    }
}

fn fill(target: &mut String, value: Option<&str>, field: &str) {
    if !target.is_empty() {
        return;
    }
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *target = value.to_owned();
        info!(field, value, "bitbake env");
    }
}
