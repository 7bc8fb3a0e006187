use serde::Serialize;
use std::fmt;

/// The release selected for one discovered package: its newest stable version
/// that declares support for the running platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageOption {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
    pub tarball: String,
}

impl fmt::Display for PackageOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
