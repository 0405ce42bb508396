//! Yocto build environment introspection.
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`BuildEnvError`)
//! - [`capture`]: Runs `bitbake -e` after sourcing the build environment script (`DumpCapture`)
//! - [`dump`]: Parses the captured dump into partial bindings (`EnvDump`, `parse_dump`)
//! - [`discovery`]: Locates `license.manifest` and `*rootfs.cve` in the deploy tree
//!
//! # Architecture
//!
//! ```text
//! oe-init-build-env --> DumpCapture --> raw text --> parse_dump --> EnvDump
//!                                                                     |
//!                                                         EnvDump::apply(&mut RunConfiguration)
//!                                                                     |
//!                                                     discover(&mut RunConfiguration)
//!                                                       |                         |
//!                                          licenses/<target>-<machine>-*   images/<machine>/*rootfs.cve
//! ```

pub mod capture;
pub mod discovery;
pub mod dump;
pub mod error;

// --- Public API Re-exports ---

pub use capture::DumpCapture;
pub use discovery::{DiscoveryOutcome, discover, find_cve_file, find_manifest};
pub use dump::{EnvDump, parse_dump};
pub use error::BuildEnvError;
