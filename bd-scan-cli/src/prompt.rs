//! Interactive prompt primitives
//!
//! Every prompt loops until it gets acceptable input or the quit sentinel
//! (`q` or `quit`, any case). Quitting, and running out of input, yields
//! [`PromptError::Quit`]; the caller ends the run.
//!
//! Prompts and re-prompts are written to the output stream; only the
//! outcome of a prompt is logged.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, error, info, warn};

/// Prompt failure
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Quit sentinel entered, or input closed
    #[error("quit requested")]
    Quit,

    /// Search-or-enter ended without an existing file
    #[error("unable to locate {description}")]
    NotFound {
        /// What was being searched for
        description: String,
    },

    /// Reading the answer or writing the prompt failed
    #[error("prompt io error: {0}")]
    Io(#[from] std::io::Error),
}

fn is_quit(val: &str) -> bool {
    let val = val.trim();
    val.eq_ignore_ascii_case("q") || val.eq_ignore_ascii_case("quit")
}

/// Reads answers from `input`, writes prompts to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the prompter, returning the streams.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Writes a line that is not a question.
    pub fn say(&mut self, line: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn ask(&mut self, text: &str) -> Result<String, PromptError> {
        write!(self.output, "{text}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("input closed");
            return Err(self.quit());
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_owned())
    }

    fn quit(&self) -> PromptError {
        info!("terminating");
        PromptError::Quit
    }

    /// All-digit answer.
    pub fn number(&mut self, prompt: &str) -> Result<usize, PromptError> {
        loop {
            let val = self.ask(&format!("{prompt} (q to quit)"))?;
            if is_quit(&val) {
                return Err(self.quit());
            }
            let val = val.trim();
            if !val.is_empty() && val.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(n) = val.parse() {
                    return Ok(n);
                }
            }
            self.say("Please enter a number (or q)")?;
        }
    }

    /// File path.
    ///
    /// With `accept_empty`, an empty answer is returned as is. With
    /// `require_exists`, any other answer must name an existing file.
    pub fn file(
        &mut self,
        prompt: &str,
        accept_empty: bool,
        require_exists: bool,
    ) -> Result<String, PromptError> {
        let help = if accept_empty {
            "(q to quit, Enter to skip)"
        } else {
            "(q to quit)"
        };
        loop {
            let val = self.ask(&format!("{prompt} {help}"))?;
            if is_quit(&val) {
                return Err(self.quit());
            }
            if accept_empty && val.is_empty() {
                return Ok(val);
            }
            if !require_exists || Path::new(&val).is_file() {
                return Ok(val);
            }
            self.say(&format!("Invalid input (\"{val}\" is not a file)"))?;
        }
    }

    /// Existing directory, or empty to skip.
    pub fn folder(&mut self, prompt: &str) -> Result<String, PromptError> {
        loop {
            let val = self.ask(&format!("{prompt} (q to quit, Enter to skip)"))?;
            if is_quit(&val) {
                return Err(self.quit());
            }
            if val.is_empty() || Path::new(&val).is_dir() {
                return Ok(val);
            }
            self.say(&format!("Invalid input (\"{val}\" is not a folder)"))?;
        }
    }

    /// Non-empty string.
    pub fn string(&mut self, prompt: &str) -> Result<String, PromptError> {
        loop {
            let val = self.ask(&format!("{prompt} (q to quit)"))?;
            if is_quit(&val) {
                return Err(self.quit());
            }
            if !val.is_empty() {
                return Ok(val);
            }
        }
    }

    /// String, falling back to `default` on an empty answer.
    pub fn string_default(&mut self, prompt: &str, default: &str) -> Result<String, PromptError> {
        let val = self.ask(&format!(
            "{prompt} [Press return for '{default}'] (q to quit)"
        ))?;
        if is_quit(&val) {
            return Err(self.quit());
        }
        if val.is_empty() {
            info!(default, "using default");
            return Ok(default.to_owned());
        }
        Ok(val)
    }

    /// `y`/`yes` or `n`/`no`, any case.
    pub fn yes_no(&mut self, prompt: &str) -> Result<bool, PromptError> {
        loop {
            let val = self.ask(&format!("{prompt} (y/n/q)"))?;
            if is_quit(&val) {
                return Err(self.quit());
            }
            match val.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please enter y or n")?,
            }
        }
    }

    /// Search-or-enter: offers the files matching `pattern` anywhere under
    /// `root`, then falls back to typing a path.
    ///
    /// # Errors
    ///
    /// [`PromptError::NotFound`] when the final answer is not an existing file.
    pub fn file_pattern(
        &mut self,
        pattern: &str,
        description: &str,
        root: &str,
    ) -> Result<String, PromptError> {
        let mut selected = None;

        if self.yes_no(&format!(
            "Do you want to search recursively for '{description}'?"
        ))? {
            let matches = search(root, pattern);
            if matches.is_empty() {
                self.say(&format!("Unable to find {description} ..."))?;
            } else {
                selected = self.choose(description, &matches)?;
            }
        }

        let val = match selected {
            Some(path) => path.display().to_string(),
            None => self.file(&format!("Please enter the {description} path"), false, true)?,
        };

        if !Path::new(&val).is_file() {
            error!(path = %val, "unable to locate {description}");
            return Err(PromptError::NotFound {
                description: description.to_owned(),
            });
        }
        Ok(val)
    }

    /// Numbered pick from `matches`; 0 means none of them.
    fn choose(
        &mut self,
        description: &str,
        matches: &[PathBuf],
    ) -> Result<Option<PathBuf>, PromptError> {
        self.say(&format!("Please select the {description} file to be used: "))?;
        self.say("\t0: None of the below")?;
        for (i, path) in matches.iter().enumerate() {
            self.say(&format!("\t{}: {}", i + 1, path.display()))?;
        }

        loop {
            match self.number("Please enter file entry number")? {
                0 => return Ok(None),
                n if n <= matches.len() => return Ok(Some(matches[n - 1].clone())),
                _ => self.say(&format!(
                    "Please enter a number between 0 and {}",
                    matches.len()
                ))?,
            }
        }
    }
}

/// Files named by `pattern` at any depth under `root`, sorted.
pub fn search(root: &str, pattern: &str) -> Vec<PathBuf> {
    let full = Path::new(&Pattern::escape(root))
        .join("**")
        .join(pattern)
        .to_string_lossy()
        .into_owned();

    let paths = match glob::glob(&full) {
        Ok(paths) => paths,
        Err(e) => {
            warn!(pattern = %full, error = %e, "invalid search pattern");
            return Vec::new();
        }
    };

    let mut matches: Vec<PathBuf> = paths
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    matches.sort();
    debug!(pattern = %full, matches = matches.len(), "search results");
    matches
}
