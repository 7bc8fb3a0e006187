//! Streaming retrieval of release tarballs.
//!
//! The download runs on the async side and forwards each body chunk over a
//! bounded channel; the tar decoder runs on a blocking thread and pulls from
//! that channel through a [`std::io::Read`] adapter. Neither side holds the
//! whole tarball in memory, only the entries that match the filter.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Read;
use tokio::sync::mpsc::{self, Receiver};

use crate::archive::{MatchedEntry, TarGzFilter};
use crate::registry::Registry;

/// Chunks buffered between the download and the decoder.
const CHANNEL_CAPACITY: usize = 16;

/// Blocking reader over chunks arriving on a channel. End of stream is the
/// sender being dropped.
pub struct ChannelReader {
    rx: Receiver<Vec<u8>>,
    current: Vec<u8>,
    pos: usize,
}

impl ChannelReader {
    pub fn new(rx: Receiver<Vec<u8>>) -> Self {
        Self {
            rx,
            current: Vec::new(),
            pos: 0,
        }
    }
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        while self.pos >= self.current.len() {
            // Must not be called from within an async context.
            match self.rx.blocking_recv() {
                Some(chunk) => {
                    self.current = chunk;
                    self.pos = 0;
                }
                None => return Ok(0),
            }
        }

        let n = buf.len().min(self.current.len() - self.pos);
        buf[..n].copy_from_slice(&self.current[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Download the tarball at `url` and return its entries matching `filter`.
///
/// A failed download takes precedence over any decoding error it caused.
#[tracing::instrument(skip(registry, filter))]
pub async fn fetch_archives(
    registry: &dyn Registry,
    url: &str,
    filter: &TarGzFilter,
) -> Result<Vec<MatchedEntry>> {
    let (tx, rx) = mpsc::channel::<Vec<u8>>(CHANNEL_CAPACITY);

    let decoder = filter.clone();
    let extraction =
        tokio::task::spawn_blocking(move || decoder.extract(ChannelReader::new(rx)));

    let downloaded = registry.fetch_tarball(url, tx).await;
    let extracted = extraction.await.context("Tarball extraction task failed")?;

    let bytes = downloaded?;
    let entries = extracted.with_context(|| format!("Failed to unpack {}", url))?;

    debug!("Downloaded {} bytes from {}", bytes, url);
    info!("Download complete.");
    Ok(entries)
}
