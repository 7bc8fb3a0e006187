//! Package registry abstraction.
//!
//! The pipeline talks to the registry through the [`Registry`] trait: one
//! search call, one metadata call per package, and one streamed tarball
//! download per selected release.

mod npm;
mod types;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

pub use npm::NpmRegistry;
pub use types::{Dist, PackageMetadata, PackageRef, SearchObject, SearchResponse, VersionRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    /// Run a search query and return the matching packages in registry order.
    async fn search(&self, text: &str) -> Result<Vec<PackageRef>>;

    /// Fetch the full metadata document (all published versions) of one package.
    async fn package_metadata(&self, name: &str) -> Result<PackageMetadata>;

    /// Stream a release tarball into `sink`, returning the number of bytes sent.
    async fn fetch_tarball(&self, url: &str, sink: Sender<Vec<u8>>) -> Result<u64>;
}
