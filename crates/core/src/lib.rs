//! Shared building blocks for `bd-scan-yocto`.
//!
//! # Module Structure
//!
//! - [`config`]: the run configuration record and environment sources
//! - [`error`]: domain error types (`BdScanError`, `ConfigError`)
//! - [`types`]: small domain enums (`PackageType`)

pub mod config;
pub mod error;
pub mod types;

// --- Public API Re-exports ---

pub use config::{EnvSource, ProcessEnv, RunConfiguration};
pub use error::{BdScanError, BuildEnvFailure, ConfigError};
pub use types::PackageType;
