//! CLI argument parsing using clap derive API
//!
//! Purely declarative, no side effects. Every flag also accepts the
//! underscore spelling used by earlier releases (`--blackduck_url`,
//! `--cve_check_only`, ...).

use clap::{Parser, ValueEnum};

/// Black Duck scan of a Yocto project.
///
/// Resolves server, project and build settings from flags, environment,
/// the Yocto build tree and (when needed) an interactive wizard.
#[derive(Parser, Debug)]
#[command(name = "bd-scan-yocto", about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Black Duck server URL (REQUIRED, or BLACKDUCK_URL).
    #[arg(long, alias = "blackduck_url")]
    pub blackduck_url: Option<String>,

    /// Black Duck API token (REQUIRED, or BLACKDUCK_API_TOKEN).
    #[arg(long, alias = "blackduck_api_token")]
    pub blackduck_api_token: Option<String>,

    /// Trust the Black Duck server certificate.
    #[arg(long, alias = "blackduck_trust_cert")]
    pub blackduck_trust_cert: bool,

    /// Synopsys Detect jar path.
    #[arg(long, alias = "detect_jar_path")]
    pub detect_jar_path: Option<String>,

    /// Black Duck project to create (REQUIRED).
    #[arg(short, long)]
    pub project: Option<String>,

    /// Black Duck project version to create (REQUIRED).
    #[arg(short = 'v', long)]
    pub version: Option<String>,

    /// Yocto build environment config file.
    #[arg(long, alias = "oe_build_env", default_value = "oe-init-build-env")]
    pub oe_build_env: String,

    /// Yocto target (default 'core-image-sato'); an empty value clears it.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Built license.manifest file.
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// Machine architecture, for example 'qemux86_64' (default from bitbake, then 'qemux86_64').
    #[arg(long)]
    pub machine: Option<String>,

    /// Skip running Detect for Bitbake dependencies.
    #[arg(long, alias = "skip_detect_for_bitbake")]
    pub skip_detect_for_bitbake: bool,

    /// Additional Synopsys Detect options.
    #[arg(long, alias = "detect_opts", allow_hyphen_values = true)]
    pub detect_opts: Option<String>,

    /// Only check for patched CVEs from cve_check and update the existing project (skip scans).
    #[arg(long, alias = "cve_check_only")]
    pub cve_check_only: bool,

    /// Skip checking/updating patched CVEs.
    #[arg(long, alias = "no_cve_check")]
    pub no_cve_check: bool,

    /// CVE check output file (determined from the build when not given).
    #[arg(long, alias = "cve_check_file")]
    pub cve_check_file: Option<String>,

    /// Start the command line wizard (it also runs when the configuration is incomplete).
    #[arg(long)]
    pub wizard: bool,

    /// Do not use the wizard or inspect the build tree (command line batch only).
    #[arg(long, aliases = ["no_wizard", "no-wizard"], conflicts_with = "wizard")]
    pub nowizard: bool,

    /// Comma-delimited layers whose recipe packages are expanded and snippet scanned.
    #[arg(long, alias = "extended_scan_layers")]
    pub extended_scan_layers: Option<String>,

    /// Run snippet scan for downloaded package files.
    #[arg(long)]
    pub snippets: bool,

    /// Comma-delimited layers whose recipe packages are not signature scanned.
    #[arg(long, alias = "exclude_layers")]
    pub exclude_layers: Option<String>,

    /// Folder where original packages are downloaded (usually poky/build/downloads).
    #[arg(long, alias = "download_dir")]
    pub download_dir: Option<String>,

    /// Folder holding built rpm packages (usually poky/build/tmp/deploy/rpm/<ARCH>).
    #[arg(long, alias = "rpm_dir")]
    pub rpm_dir: Option<String>,

    /// Test mode: skip build environment and runtime checks.
    #[arg(long)]
    pub testmode: bool,

    /// Debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log line format.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Format of the resolved configuration report.
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,
}

impl Cli {
    /// Build tree inspection and the wizard are allowed.
    pub fn interactive(&self) -> bool {
        !self.nowizard
    }

    /// `--debug` wins over `--log-level`; `info` otherwise.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or("info")
        }
    }
}

/// Log line formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines.
    Text,
    /// JSON lines.
    Json,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}
