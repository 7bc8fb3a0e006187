//! Version selection for discovered packages.
//!
//! For each package: order its versions newest first, drop pre-releases,
//! drop versions whose `engines` range does not admit the running platform
//! version, and keep the first survivor.

use log::debug;
use semver::Version;

use crate::registry::{PackageMetadata, VersionRecord};

use super::{EngineRange, PackageOption};

/// Selects releases compatible with one platform version.
///
/// Holds no state besides its target, so selecting twice over the same
/// metadata yields the same options.
#[derive(Debug, Clone)]
pub struct VersionSelector {
    platform: String,
    platform_version: Version,
}

impl VersionSelector {
    pub fn new(platform: impl Into<String>, platform_version: Version) -> Self {
        Self {
            platform: platform.into(),
            platform_version,
        }
    }

    /// Select at most one option per package, preserving package order.
    pub fn select_all(&self, packages: &[PackageMetadata]) -> Vec<PackageOption> {
        packages.iter().filter_map(|p| self.select(p)).collect()
    }

    /// The newest stable, compatible release of `package`, if there is one.
    pub fn select(&self, package: &PackageMetadata) -> Option<PackageOption> {
        let selected = Self::sorted_versions(package)
            .into_iter()
            .filter(|(version, _)| !Self::is_prerelease(version))
            .find(|(version, record)| self.is_compatible(&package.name, version, record));

        let Some((version, record)) = selected else {
            debug!(
                "{}: no stable version supports {} {}",
                package.name, self.platform, self.platform_version
            );
            return None;
        };

        // Compatibility already required a tarball to be present.
        let tarball = record.tarball()?.to_string();
        debug!("{}: selected version {}", package.name, version);

        Some(PackageOption {
            name: record.name.clone(),
            description: record.description.clone(),
            version: record.version.clone(),
            tarball,
        })
    }

    /// All versions of `package` with a valid semantic version key, newest first.
    ///
    /// Keys that are not valid versions are skipped. Versions differing only in
    /// build metadata stay in the metadata's key order, which is lexicographic.
    pub fn sorted_versions(package: &PackageMetadata) -> Vec<(Version, &VersionRecord)> {
        let mut versions: Vec<(Version, &VersionRecord)> = package
            .versions
            .iter()
            .filter_map(|(key, record)| match Version::parse(key) {
                Ok(version) => Some((version, record)),
                Err(e) => {
                    debug!("{}: skipping invalid version '{}': {}", package.name, key, e);
                    None
                }
            })
            .collect();

        versions.sort_by(|(a, _), (b, _)| b.cmp_precedence(a));
        versions
    }

    pub fn is_prerelease(version: &Version) -> bool {
        !version.pre.is_empty()
    }

    /// Whether `record` declares a range for the platform that admits the running version.
    fn is_compatible(&self, package: &str, version: &Version, record: &VersionRecord) -> bool {
        let Some(range) = record.engine_range(&self.platform) else {
            debug!(
                "{}@{}: no engines.{} declared",
                package, version, self.platform
            );
            return false;
        };

        let range: EngineRange = match range.parse() {
            Ok(range) => range,
            Err(e) => {
                debug!("{}@{}: {}", package, version, e);
                return false;
            }
        };

        if !range.admits(&self.platform_version) {
            return false;
        }

        if record.tarball().is_none() {
            debug!("{}@{}: no dist.tarball published", package, version);
            return false;
        }

        true
    }
}
