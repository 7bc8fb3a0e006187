//! HTTP client module with registry error classification.

mod client;
mod error;

use anyhow::Result;
use reqwest::Client;

pub use client::HttpClient;
pub use error::{RegistryError, classify_error, classify_status};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("bnafetch/", env!("BNAFETCH_VERSION"));

/// Build the HTTP client used for registry and tarball requests.
pub fn build_http_client() -> Result<HttpClient> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(HttpClient::new(client))
}
