use std::process;

use clap::Parser;
use tracing::{error, info};

use bd_scan_build_env::DumpCapture;
use bd_scan_cli::cli::Cli;
use bd_scan_cli::error::CliError;
use bd_scan_cli::logging::init_tracing;
use bd_scan_cli::output::OutputWriter;
use bd_scan_cli::prompt::Prompter;
use bd_scan_cli::report::ConfigReport;
use bd_scan_cli::run::resolve_configuration;
use bd_scan_core::config::ProcessEnv;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.effective_log_level(), cli.debug, cli.log_format) {
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }

    if let Err(e) = run(cli).await {
        error!(error = %e, "terminating");
        process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    info!("bd-scan-yocto starting");

    let mut prompter = Prompter::new(std::io::stdin().lock(), std::io::stdout());

    let resolution =
        resolve_configuration(&cli, &ProcessEnv, &DumpCapture::new(), &mut prompter).await?;

    let writer = OutputWriter::new(cli.output);
    writer.render(&ConfigReport::new(
        &resolution.config,
        resolution.wizard_prompts.is_some(),
    ))?;
    Ok(())
}
