//! Classification of HTTP failures into readable registry errors.

use reqwest::StatusCode;

/// A failed request to the registry, classified by HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// HTTP 401
    Unauthorized(String),
    /// HTTP 403
    Forbidden(String),
    /// HTTP 404
    NotFound(String),
    /// HTTP 429
    RateLimited(String),
    /// Any other 4xx
    ClientError(u16, String),
    /// Any 5xx
    ServerError(u16, String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Unauthorized(url) => {
                write!(f, "Authentication required: {}", url)
            }
            RegistryError::Forbidden(url) => write!(f, "Access forbidden: {}", url),
            RegistryError::NotFound(url) => write!(f, "Not found: {}", url),
            RegistryError::RateLimited(url) => {
                write!(f, "Rate limit exceeded: {}. Try again later.", url)
            }
            RegistryError::ClientError(status, url) => {
                write!(f, "Request error: HTTP {} from {}", status, url)
            }
            RegistryError::ServerError(status, url) => {
                write!(f, "Registry error: HTTP {} from {}", status, url)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Map a non-success status to a [`RegistryError`]. Returns `None` for success codes.
pub fn classify_status(status: StatusCode, url: &str) -> Option<RegistryError> {
    let url = url.to_string();
    match status {
        StatusCode::UNAUTHORIZED => Some(RegistryError::Unauthorized(url)),
        StatusCode::FORBIDDEN => Some(RegistryError::Forbidden(url)),
        StatusCode::NOT_FOUND => Some(RegistryError::NotFound(url)),
        StatusCode::TOO_MANY_REQUESTS => Some(RegistryError::RateLimited(url)),
        s if s.is_client_error() => Some(RegistryError::ClientError(s.as_u16(), url)),
        s if s.is_server_error() => Some(RegistryError::ServerError(s.as_u16(), url)),
        _ => None,
    }
}

/// Convert an error from `error_for_status()` into an anyhow error, keeping the
/// classified [`RegistryError`] when a status is available.
pub fn classify_error(error: reqwest::Error) -> anyhow::Error {
    let url = error
        .url()
        .map(|u| u.to_string())
        .unwrap_or_else(|| "<unknown url>".to_string());

    match error.status().and_then(|s| classify_status(s, &url)) {
        Some(classified) => anyhow::Error::from(classified),
        None => anyhow::Error::from(error),
    }
}
