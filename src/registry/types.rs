//! Registry wire types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response of the search endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub objects: Vec<SearchObject>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SearchObject {
    pub package: PackageRef,
}

/// A package as referenced by a search hit.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct PackageRef {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Full metadata of one package, keyed by version string.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub versions: BTreeMap<String, VersionRecord>,
}

/// One published version of a package.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct VersionRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: String,
    /// Left untyped: old publications carry arrays or strings here.
    #[serde(default)]
    pub engines: Option<serde_json::Value>,
    #[serde(default)]
    pub dist: Option<Dist>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Dist {
    #[serde(default)]
    pub tarball: Option<String>,
}

impl SearchResponse {
    pub fn into_packages(self) -> Vec<PackageRef> {
        self.objects.into_iter().map(|o| o.package).collect()
    }
}

impl VersionRecord {
    /// The declared compatibility range for `platform`, if any.
    pub fn engine_range(&self, platform: &str) -> Option<&str> {
        self.engines
            .as_ref()?
            .get(platform)?
            .as_str()
            .filter(|range| !range.is_empty())
    }

    pub fn tarball(&self) -> Option<&str> {
        self.dist.as_ref()?.tarball.as_deref()
    }
}
