//! Full resolution sequence
//!
//! 1. flags and environment ([`resolve`])
//! 2. `bitbake -e` dump, unless `--nowizard` or test mode
//! 3. default machine
//! 4. deploy tree discovery, unless `--nowizard`
//! 5. wizard, when forced or something required is missing, unless `--nowizard`
//! 6. project/version ready check

use std::io::{BufRead, Write};
use std::path::Path;

use tracing::{info, warn};

use bd_scan_build_env::{DumpCapture, discover, parse_dump};
use bd_scan_core::config::{EnvSource, RunConfiguration};

use crate::cli::Cli;
use crate::error::CliError;
use crate::prompt::Prompter;
use crate::resolve::resolve;
use crate::wizard::{default_fields, run_wizard};

/// Result of a completed resolution.
#[derive(Debug)]
pub struct Resolution {
    pub config: RunConfiguration,
    /// Fields the wizard prompted for; `None` if it did not run
    pub wizard_prompts: Option<usize>,
}

/// Runs every resolution stage in order and checks the record is ready
/// for scanning.
pub async fn resolve_configuration<R: BufRead, W: Write>(
    cli: &Cli,
    env: &dyn EnvSource,
    capture: &DumpCapture,
    prompter: &mut Prompter<R, W>,
) -> Result<Resolution, CliError> {
    let mut config = resolve(cli, env)?;

    if cli.interactive() && !config.test_mode {
        let raw = capture
            .capture(Path::new(&config.build_env_script))
            .await?;
        let dump = parse_dump(&raw);
        if dump.is_empty() {
            warn!("environment dump contained none of the expected variables");
        }
        dump.apply(&mut config);
    }

    if config.default_machine_if_unset() {
        info!(machine = %config.machine, "machine not specified, using default");
    }

    if cli.interactive() {
        discover(&mut config);
    }

    let missing = config.missing_required();
    let wizard_prompts = if cli.interactive() && (cli.wizard || !missing.is_empty()) {
        Some(run_wizard(&default_fields(), &mut config, prompter)?)
    } else {
        if !missing.is_empty() {
            warn!(fields = %missing.join(", "), "configuration incomplete and wizard disabled");
        }
        None
    };

    config.ensure_ready()?;
    Ok(Resolution {
        config,
        wizard_prompts,
    })
}
