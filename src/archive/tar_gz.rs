use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::{debug, info};
use std::io::Read;
use tar::Archive;

/// One archive entry whose path matched the filter, read fully into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedEntry {
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Walks a gzipped tar stream and buffers the regular files ending in one extension.
#[derive(Debug, Clone)]
pub struct TarGzFilter {
    extension: String,
}

impl TarGzFilter {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        path.ends_with(&self.extension)
    }

    /// Read `reader` to the end of the tar stream, collecting matching entries
    /// in archive order. Entries are read one at a time from the stream, so the
    /// reader may be fed incrementally.
    pub fn extract<R: Read>(&self, reader: R) -> Result<Vec<MatchedEntry>> {
        let mut archive = Archive::new(GzDecoder::new(reader));
        let mut matched = Vec::new();

        let entries = archive
            .entries()
            .context("Failed to read tar.gz stream")?;

        for entry in entries {
            let mut entry = entry.context("Failed to read tar entry")?;

            if !entry.header().entry_type().is_file() {
                continue;
            }

            let path = entry
                .path()
                .context("Failed to read tar entry path")?
                .to_string_lossy()
                .into_owned();

            if !self.matches(&path) {
                debug!("Skipping {}", path);
                continue;
            }

            info!("Found business network archive in package {}", path);

            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut bytes)
                .with_context(|| format!("Failed to read {} from tarball", path))?;

            debug!("Buffered {} bytes from {}", bytes.len(), path);
            matched.push(MatchedEntry { path, bytes });
        }

        Ok(matched)
    }
}
