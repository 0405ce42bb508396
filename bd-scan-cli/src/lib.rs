//! `bd-scan-yocto` command line: configuration resolution for a Black Duck
//! scan of a Yocto build.
//!
//! # Module Structure
//!
//! - [`cli`]: clap argument definitions
//! - [`resolve`]: flags and environment into a `RunConfiguration`
//! - [`prompt`]: interactive prompt primitives
//! - [`wizard`]: fills unresolved fields through prompts
//! - [`run`]: the full resolution sequence
//! - [`report`], [`output`]: rendering the resolved configuration
//! - [`logging`], [`error`]: tracing setup and exit codes

pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod report;
pub mod resolve;
pub mod run;
pub mod wizard;
