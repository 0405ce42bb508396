//! Interactive completion wizard
//!
//! Walks an ordered list of [`WizardField`]s and prompts for every field of
//! the [`RunConfiguration`] that is still unresolved. A resolved field is
//! never prompted for and never overwritten.

use std::io::{BufRead, Write};

use tracing::debug;

use bd_scan_core::config::RunConfiguration;

use crate::prompt::{PromptError, Prompter};

/// Accessors for a string field.
#[derive(Clone, Copy)]
pub struct TextField {
    pub get: fn(&RunConfiguration) -> &str,
    pub set: fn(&mut RunConfiguration, String),
}

/// Accessors for a boolean field.
#[derive(Clone, Copy)]
pub struct FlagField {
    pub get: fn(&RunConfiguration) -> bool,
    pub set: fn(&mut RunConfiguration, bool),
}

/// Which prompt fills the field.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// Required string
    String(TextField),
    /// Yes/no; unresolved while false
    YesNo(FlagField),
    /// Existing file
    File(TextField),
    /// Existing directory, or empty
    Folder(TextField),
    /// Search-or-enter for a file name under a search root
    FilePattern {
        field: TextField,
        pattern: &'static str,
        description: &'static str,
        search_root: fn(&RunConfiguration) -> &str,
    },
}

/// One wizard step.
#[derive(Clone, Copy)]
pub struct WizardField {
    /// Field name used in logs
    pub name: &'static str,
    pub prompt: &'static str,
    pub kind: FieldKind,
    /// Skips the field when it returns true
    pub skip_if: Option<fn(&RunConfiguration) -> bool>,
    /// Value is redacted in logs
    pub secret: bool,
}

impl WizardField {
    fn new(name: &'static str, prompt: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            prompt,
            kind,
            skip_if: None,
            secret: false,
        }
    }

    fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    fn skip_if(mut self, guard: fn(&RunConfiguration) -> bool) -> Self {
        self.skip_if = Some(guard);
        self
    }

    /// Field already holds a value.
    pub fn is_resolved(&self, config: &RunConfiguration) -> bool {
        match self.kind {
            FieldKind::String(f)
            | FieldKind::File(f)
            | FieldKind::Folder(f)
            | FieldKind::FilePattern { field: f, .. } => !(f.get)(config).is_empty(),
            FieldKind::YesNo(f) => (f.get)(config),
        }
    }

    fn is_skipped(&self, config: &RunConfiguration) -> bool {
        self.skip_if.is_some_and(|guard| guard(config))
    }

    /// Prompts for the field and stores the answer.
    fn fill<R: BufRead, W: Write>(
        &self,
        config: &mut RunConfiguration,
        prompter: &mut Prompter<R, W>,
    ) -> Result<String, PromptError> {
        let (field, val) = match self.kind {
            FieldKind::YesNo(f) => {
                let val = prompter.yes_no(self.prompt)?;
                (f.set)(config, val);
                return Ok(val.to_string());
            }
            FieldKind::String(f) => (f, prompter.string(self.prompt)?),
            FieldKind::File(f) => (f, prompter.file(self.prompt, false, true)?),
            FieldKind::Folder(f) => (f, prompter.folder(self.prompt)?),
            FieldKind::FilePattern {
                field,
                pattern,
                description,
                search_root,
            } => {
                let root = match search_root(config) {
                    "" => ".".to_owned(),
                    root => root.to_owned(),
                };
                (field, prompter.file_pattern(pattern, description, &root)?)
            }
        };
        (field.set)(config, val.clone());
        Ok(val)
    }
}

macro_rules! text_field {
    ($field:ident) => {
        TextField {
            get: |c| c.$field.as_str(),
            set: |c, v| c.$field = v,
        }
    };
}

/// The wizard steps, in prompt order.
pub fn default_fields() -> Vec<WizardField> {
    vec![
        WizardField::new(
            "server_url",
            "Black Duck server URL",
            FieldKind::String(text_field!(server_url)),
        ),
        WizardField::new(
            "api_token",
            "Black Duck API token",
            FieldKind::String(text_field!(api_token)),
        )
        .secret(),
        WizardField::new(
            "trust_cert",
            "Trust BD Server certificate",
            FieldKind::YesNo(FlagField {
                get: |c| c.trust_cert,
                set: |c, v| c.trust_cert = v,
            }),
        ),
        WizardField::new(
            "project",
            "Black Duck project name",
            FieldKind::String(text_field!(project)),
        ),
        WizardField::new(
            "version",
            "Black Duck version name",
            FieldKind::String(text_field!(version)),
        ),
        WizardField::new(
            "manifest_file",
            "Manifest file path",
            FieldKind::FilePattern {
                field: text_field!(manifest_file),
                pattern: "license.manifest",
                description: "license.manifest file",
                search_root: |c| c.deploy_dir.as_str(),
            },
        ),
        WizardField::new(
            "target",
            "Yocto target name",
            FieldKind::String(text_field!(target)),
        )
        .skip_if(|c| c.skip_detect_for_bitbake),
        WizardField::new(
            "download_dir",
            "Yocto package download folder",
            FieldKind::Folder(text_field!(download_dir)),
        ),
        WizardField::new(
            "package_dir",
            "Yocto rpm package download folder",
            FieldKind::Folder(text_field!(package_dir)),
        ),
    ]
}

/// Prompts for every unresolved, unguarded field in order.
///
/// Returns the number of fields prompted for.
pub fn run_wizard<R: BufRead, W: Write>(
    fields: &[WizardField],
    config: &mut RunConfiguration,
    prompter: &mut Prompter<R, W>,
) -> Result<usize, PromptError> {
    prompter.say("\nRUNNING WIZARD (use --nowizard to disable) ...")?;

    let mut prompted = 0;
    for step in fields {
        if step.is_resolved(config) {
            continue;
        }
        if step.is_skipped(config) {
            debug!(field = step.name, "skipped by guard");
            continue;
        }

        let val = step.fill(config, prompter)?;
        prompted += 1;
        if step.secret {
            debug!(field = step.name, value = "***REDACTED***", "wizard set field");
        } else {
            debug!(field = step.name, value = %val, "wizard set field");
        }
    }

    if prompted == 0 {
        prompter.say("- Nothing for Wizard to do - continuing ...\n")?;
    }
    Ok(prompted)
}
