//! Discover use case - finds published business networks for this platform.
//!
//! This use case runs four stages, each strictly after the previous one:
//! - Discovery: one registry search
//! - Metadata fetch: one request per discovered package, in search order
//! - Selection: newest stable compatible version per package
//! - Retrieval: download each selected tarball and parse its archives

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::archive::{ArchiveParser, NetworkDefinition, TarGzFilter};
use crate::config::Config;
use crate::download::fetch_archives;
use crate::package::{PackageOption, VersionSelector};
use crate::registry::{PackageMetadata, PackageRef, Registry};

/// An archive found inside a selected release, with its parsed definition
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredArchive {
    /// Path of the archive inside the tarball
    pub path: String,
    pub definition: NetworkDefinition,
}

/// Outcome of retrieving one selected release
#[derive(Debug, Clone, PartialEq)]
pub struct OptionReport {
    pub option: PackageOption,
    /// Archives in tarball order; empty when the release ships none
    pub archives: Vec<DiscoveredArchive>,
}

/// Outcome of a whole run, in processing order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunReport {
    pub options: Vec<OptionReport>,
}

impl OptionReport {
    /// One line per option: `name@version: id, id` or `name@version: no archive`.
    pub fn summary(&self) -> String {
        if self.archives.is_empty() {
            return format!("{}: no archive", self.option);
        }
        let ids: Vec<String> = self
            .archives
            .iter()
            .map(|a| a.definition.identifier())
            .collect();
        format!("{}: {}", self.option, ids.join(", "))
    }
}

/// Discover use case - platform-specific discovery orchestration
pub struct DiscoverUseCase<'a> {
    registry: &'a dyn Registry,
    parser: &'a dyn ArchiveParser,
    config: &'a Config,
    selector: VersionSelector,
    filter: TarGzFilter,
}

impl<'a> DiscoverUseCase<'a> {
    pub fn new(
        registry: &'a dyn Registry,
        parser: &'a dyn ArchiveParser,
        config: &'a Config,
    ) -> Self {
        Self {
            registry,
            parser,
            config,
            selector: VersionSelector::new(
                config.platform.clone(),
                config.platform_version.clone(),
            ),
            filter: TarGzFilter::new(config.archive_extension.clone()),
        }
    }

    /// Run every stage. The first error aborts the run.
    pub async fn run(&self) -> Result<RunReport> {
        let packages = self.discover().await?;
        let metadata = self.fetch_metadata(&packages).await?;
        let options = self.select(&metadata);

        // Presenting the options for a choice is out of scope; every one is retrieved.
        let mut report = RunReport::default();
        for option in &options {
            report.options.push(self.retrieve(option).await?);
        }

        Ok(report)
    }

    /// Search the registry for packages carrying the configured keywords and maintainer.
    #[tracing::instrument(skip(self))]
    pub async fn discover(&self) -> Result<Vec<PackageRef>> {
        let text = self.config.search_text();
        info!("Searching for packages matching '{}'...", text);

        let packages = self.registry.search(&text).await?;
        info!("Found {} candidate packages", packages.len());
        Ok(packages)
    }

    /// Fetch full metadata for each package, one request at a time, in input order.
    #[tracing::instrument(skip(self, packages))]
    pub async fn fetch_metadata(&self, packages: &[PackageRef]) -> Result<Vec<PackageMetadata>> {
        let mut metadata = Vec::with_capacity(packages.len());
        for package in packages {
            debug!("Fetching metadata for {}...", package.name);
            let mut fetched = self.registry.package_metadata(&package.name).await?;
            if fetched.name.is_empty() {
                fetched.name = package.name.clone();
            }
            metadata.push(fetched);
        }
        Ok(metadata)
    }

    /// Reduce each package to its newest compatible stable release.
    pub fn select(&self, metadata: &[PackageMetadata]) -> Vec<PackageOption> {
        let options = self.selector.select_all(metadata);
        info!(
            "{} of {} packages have a release supporting {} {}",
            options.len(),
            metadata.len(),
            self.config.platform,
            self.config.platform_version
        );
        options
    }

    /// Download one selected release and parse every matching archive it contains.
    #[tracing::instrument(skip(self, option), fields(option = %option))]
    pub async fn retrieve(&self, option: &PackageOption) -> Result<OptionReport> {
        info!(
            "Downloading {} {} {} {}",
            option.name,
            option.description.as_deref().unwrap_or(""),
            option.version,
            option.tarball
        );

        let entries = fetch_archives(self.registry, &option.tarball, &self.filter).await?;

        if entries.is_empty() {
            warn!(
                "No {} file found in {}, skipping",
                self.config.archive_extension, option
            );
        }

        let mut archives = Vec::with_capacity(entries.len());
        for entry in entries {
            let definition = self.parser.parse(&entry.bytes).with_context(|| {
                format!(
                    "Failed to parse business network archive {} from {}",
                    entry.path, option
                )
            })?;

            info!(
                "Found business network definition {}",
                definition.identifier()
            );
            archives.push(DiscoveredArchive {
                path: entry.path,
                definition,
            });
        }

        Ok(OptionReport {
            option: option.clone(),
            archives,
        })
    }
}
