//! Domain types for the Yocto build context.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Package format produced by the Yocto build (`IMAGE_PKGTYPE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// RPM packages (`DEPLOY_DIR_RPM`)
    Rpm,
    /// opkg packages (`DEPLOY_DIR_IPK`)
    Ipk,
    /// Debian packages
    Deb,
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rpm => write!(f, "rpm"),
            Self::Ipk => write!(f, "ipk"),
            Self::Deb => write!(f, "deb"),
        }
    }
}

impl PackageType {
    /// Parses a package type selector (case-insensitive, surrounding
    /// whitespace ignored).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rpm" => Some(Self::Rpm),
            "ipk" => Some(Self::Ipk),
            "deb" => Some(Self::Deb),
            _ => None,
        }
    }
}
