//! Integration tests for build environment introspection
//!
//! Builds a fake Yocto deploy tree on disk and runs dump parsing plus
//! discovery against it.

use std::fs;
use std::path::Path;

use bd_scan_build_env::{discover, find_cve_file, find_manifest, parse_dump};
use bd_scan_core::config::RunConfiguration;
use bd_scan_core::types::PackageType;
use tempfile::TempDir;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().expect("path has parent")).expect("should create dirs");
    fs::write(path, "").expect("should write file");
}

#[test]
fn test_manifest_discovery_picks_lexicographically_last_build() {
    // Given: two date-stamped license directories for the same target/machine
    let deploy = TempDir::new().expect("should create temp dir");
    let older = deploy
        .path()
        .join("licenses/core-image-sato-qemu-x86-64-20230101/license.manifest");
    let newer = deploy
        .path()
        .join("licenses/core-image-sato-qemu-x86-64-20230202/license.manifest");
    touch(&newer);
    touch(&older);

    let mut config = RunConfiguration {
        deploy_dir: deploy.path().display().to_string(),
        target: "core-image-sato".to_owned(),
        machine: "qemu-x86-64".to_owned(),
        ..Default::default()
    };

    // When: running discovery
    let outcome = discover(&mut config);

    // Then: the 20230202 manifest wins
    assert_eq!(outcome.manifest_file.as_deref(), Some(newer.as_path()));
    assert_eq!(config.manifest_file, newer.display().to_string());
}

#[test]
fn test_manifest_match_that_is_a_directory_is_rejected() {
    // Given: the last match is a directory, not a file
    let deploy = TempDir::new().expect("should create temp dir");
    fs::create_dir_all(
        deploy
            .path()
            .join("licenses/img-m-2/license.manifest"),
    )
    .expect("should create dir");

    let config = RunConfiguration {
        deploy_dir: deploy.path().display().to_string(),
        target: "img".to_owned(),
        machine: "m".to_owned(),
        ..Default::default()
    };

    // Then: nothing is selected
    assert_eq!(find_manifest(&config).expect("pattern is valid"), None);
}

#[test]
fn test_cve_discovery_picks_last_name_and_enables_cve_check() {
    // Given: two CVE reports in the machine's image directory
    let deploy = TempDir::new().expect("should create temp dir");
    let images = deploy.path().join("images/qemu-x86-64");
    touch(&images.join("img-qemu-x86-64-2rootfs.cve"));
    touch(&images.join("img-qemu-x86-64-1rootfs.cve"));

    let mut config = RunConfiguration {
        deploy_dir: deploy.path().display().to_string(),
        target: "img".to_owned(),
        machine: "qemu-x86-64".to_owned(),
        ..Default::default()
    };

    // When: running discovery
    let outcome = discover(&mut config);

    // Then: the "-2" report is chosen and CVE checking is switched on
    let expected = images.join("img-qemu-x86-64-2rootfs.cve");
    assert_eq!(outcome.cve_check_file.as_deref(), Some(expected.as_path()));
    assert_eq!(config.cve_check_file, expected.display().to_string());
    assert!(config.cve_check);
}

#[test]
fn test_cve_discovery_uses_hyphenated_machine_directory() {
    // Given: MACHINE_ARCH style name with underscores
    let deploy = TempDir::new().expect("should create temp dir");
    let images = deploy.path().join("images/qemux86-64");
    touch(&images.join("core-image-sato-qemux86-64-20240101rootfs.cve"));

    let config = RunConfiguration {
        deploy_dir: deploy.path().display().to_string(),
        target: "core-image-sato".to_owned(),
        machine: "qemux86_64".to_owned(),
        ..Default::default()
    };

    // Then: the report is found under the hyphenated directory
    let found = find_cve_file(&config).expect("image dir exists");
    assert_eq!(
        found,
        Some(images.join("core-image-sato-qemux86-64-20240101rootfs.cve"))
    );
}

#[test]
fn test_dump_then_discovery_fills_configuration() {
    // Given: a deploy tree and a dump pointing at it
    let deploy = TempDir::new().expect("should create temp dir");
    let manifest = deploy
        .path()
        .join("licenses/core-image-sato-qemux86-64-20240301/license.manifest");
    let cve = deploy
        .path()
        .join("images/qemux86-64/core-image-sato-qemux86-64-20240301rootfs.cve");
    touch(&manifest);
    touch(&cve);

    let raw = format!(
        "DEPLOY_DIR=\"{deploy}\"\nMACHINE_ARCH=\"qemux86_64\"\nIMAGE_PKGTYPE=\"rpm\"\n\
         DEPLOY_DIR_RPM=\"{deploy}/rpm\"\nDL_DIR=\"/build/downloads\"\n",
        deploy = deploy.path().display()
    );

    let mut config = RunConfiguration {
        target: "core-image-sato".to_owned(),
        ..Default::default()
    };

    // When: applying the dump and running discovery
    parse_dump(&raw).apply(&mut config);
    config.default_machine_if_unset();
    discover(&mut config);

    // Then: every derived field is set
    assert_eq!(config.machine, "qemux86_64");
    assert_eq!(config.package_type, Some(PackageType::Rpm));
    assert_eq!(
        config.package_dir,
        format!("{}/rpm", deploy.path().display())
    );
    assert_eq!(config.download_dir, "/build/downloads");
    assert_eq!(config.manifest_file, manifest.display().to_string());
    assert_eq!(config.cve_check_file, cve.display().to_string());
    assert!(config.cve_check);
}
