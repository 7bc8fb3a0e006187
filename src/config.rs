//! Run configuration.
//!
//! Everything the pipeline would otherwise hard-code (registry location, the
//! platform being matched against, the search criteria and the archive
//! extension) lives here and is handed to the pipeline explicitly.

use anyhow::{Context, Result};
use semver::Version;

/// Default npm registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Path of the search endpoint, relative to the registry URL.
pub const DEFAULT_SEARCH_PATH: &str = "/-/v1/search";

/// Name of the platform under `engines` in each published version.
pub const DEFAULT_PLATFORM: &str = "composer";

/// Version of the platform that discovered packages must support.
pub const DEFAULT_PLATFORM_VERSION: &str = "0.9.0";

/// Keywords every discovered package must carry.
pub const DEFAULT_KEYWORDS: &[&str] = &["composer", "composer-network"];

/// Only packages published by this maintainer are trusted.
pub const DEFAULT_MAINTAINER: &str = "hyperledger-ci";

/// File extension of business network archives inside a package tarball.
pub const DEFAULT_ARCHIVE_EXTENSION: &str = ".bna";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub registry_url: String,
    pub search_path: String,
    pub platform: String,
    pub platform_version: Version,
    pub keywords: Vec<String>,
    pub maintainer: String,
    pub archive_extension: String,
    /// Page size sent to the search endpoint; the registry default applies when unset.
    pub search_size: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            platform_version: Version::new(0, 9, 0),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            maintainer: DEFAULT_MAINTAINER.to_string(),
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            search_size: None,
        }
    }
}

impl Config {
    /// Build a configuration from optional overrides, falling back to the defaults.
    pub fn from_overrides(
        registry_url: Option<String>,
        platform_version: Option<&str>,
        maintainer: Option<String>,
        keywords: Vec<String>,
        archive_extension: Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = registry_url {
            config.registry_url = url.trim_end_matches('/').to_string();
        }
        if let Some(version) = platform_version {
            config.platform_version = Version::parse(version.trim())
                .with_context(|| format!("Invalid platform version '{}'", version))?;
        }
        if let Some(maintainer) = maintainer {
            config.maintainer = maintainer;
        }
        if !keywords.is_empty() {
            config.keywords = keywords;
        }
        if let Some(ext) = archive_extension {
            config.archive_extension = if ext.starts_with('.') {
                ext
            } else {
                format!(".{}", ext)
            };
        }

        Ok(config)
    }

    /// Full URL of the search endpoint.
    pub fn search_url(&self) -> String {
        format!("{}{}", self.registry_url, self.search_path)
    }

    /// Full URL of a package's metadata document.
    ///
    /// Scoped names keep their `@` but have the separator encoded, as npm expects.
    pub fn package_url(&self, name: &str) -> String {
        format!("{}/{}", self.registry_url, name.replace('/', "%2F"))
    }

    /// The `text` query sent to the search endpoint.
    pub fn search_text(&self) -> String {
        format!(
            "keywords:{} maintainer:{}",
            self.keywords.join(","),
            self.maintainer
        )
    }
}
