mod bna;
mod tar_gz;

use anyhow::Result;

pub use bna::{BusinessNetworkParser, NetworkDefinition};
pub use tar_gz::{MatchedEntry, TarGzFilter};

/// Turns the bytes of one domain archive into its definition.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<NetworkDefinition>;
}
