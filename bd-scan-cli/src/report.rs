//! Resolved configuration report
//!
//! Printed once resolution finishes. The API token never appears in the
//! report.

use std::io::Write;

use serde::Serialize;

use bd_scan_core::config::RunConfiguration;

use crate::output::Render;

const REDACTED: &str = "***REDACTED***";

/// Configuration display report.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Whether the wizard ran during this resolution
    pub wizard_ran: bool,
    /// Optional fields that are still unset
    pub unresolved: Vec<String>,
    /// The resolved record, with the token redacted
    pub config: RunConfiguration,
    /// Serialized TOML configuration (text rendering only)
    #[serde(skip)]
    pub config_toml: String,
}

impl ConfigReport {
    pub fn new(config: &RunConfiguration, wizard_ran: bool) -> Self {
        let mut config = config.clone();
        config.api_token = redact_secret(&config.api_token);

        let unresolved = config
            .missing_required()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let config_toml = toml::to_string_pretty(&config)
            .unwrap_or_else(|e| format!("(serialization error: {})", e));

        Self {
            wizard_ran,
            unresolved,
            config,
            config_toml,
        }
    }
}

/// Replaces a non-empty secret with a fixed marker.
fn redact_secret(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        REDACTED.to_owned()
    }
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Resolved configuration for {} {}",
            self.config.project.bold(),
            self.config.version.bold()
        )?;
        for field in &self.unresolved {
            writeln!(w, "  {} {}", "unresolved:".yellow(), field)?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}
