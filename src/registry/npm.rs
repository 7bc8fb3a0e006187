//! npm-compatible registry implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use tokio::sync::mpsc::Sender;

use crate::config::Config;
use crate::http::HttpClient;

use super::{PackageMetadata, PackageRef, Registry, SearchResponse};

/// Registry speaking the npm search and package document API.
pub struct NpmRegistry {
    http_client: HttpClient,
    config: Config,
}

impl NpmRegistry {
    pub fn from_http_client(http_client: HttpClient, config: &Config) -> Self {
        Self {
            http_client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Registry for NpmRegistry {
    async fn search(&self, text: &str) -> Result<Vec<PackageRef>> {
        let search_url = self.config.search_url();
        debug!("Searching {} for '{}'...", search_url, text);

        let size = self.config.search_size.map(|s| s.to_string());
        let mut query = vec![("text", text)];
        if let Some(size) = size.as_deref() {
            query.push(("size", size));
        }

        let response: SearchResponse = self
            .http_client
            .get_json_with_query(&search_url, &query)
            .await
            .context("Package search failed")?;

        debug!("Search returned {} of {} packages", response.objects.len(), response.total);
        Ok(response.into_packages())
    }

    async fn package_metadata(&self, name: &str) -> Result<PackageMetadata> {
        let url = self.config.package_url(name);
        self.http_client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch metadata for package {}", name))
    }

    async fn fetch_tarball(&self, url: &str, sink: Sender<Vec<u8>>) -> Result<u64> {
        self.http_client
            .stream_to(url, sink)
            .await
            .with_context(|| format!("Failed to download {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use reqwest::Client;

    fn registry_for(server_url: &str) -> NpmRegistry {
        let config = Config {
            registry_url: server_url.to_string(),
            ..Default::default()
        };
        NpmRegistry::from_http_client(HttpClient::new(Client::new()), &config)
    }

    #[tokio::test]
    async fn test_search_sends_text_query() {
        let mut server = mockito::Server::new_async().await;
        let text = "keywords:composer,composer-network maintainer:hyperledger-ci";

        let mock = server
            .mock("GET", "/-/v1/search")
            .match_query(Matcher::UrlEncoded("text".into(), text.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"objects": [
                    {"package": {"name": "basic-sample-network"}},
                    {"package": {"name": "carauction-network"}}
                ], "total": 2}"#,
            )
            .create_async()
            .await;

        let registry = registry_for(&server.url());
        let packages = registry.search(text).await.unwrap();

        mock.assert_async().await;
        let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["basic-sample-network", "carauction-network"]);
    }

    #[tokio::test]
    async fn test_search_with_size() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/-/v1/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("text".into(), "keywords:a".into()),
                Matcher::UrlEncoded("size".into(), "250".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"objects": [], "total": 0}"#)
            .create_async()
            .await;

        let config = Config {
            registry_url: server.url(),
            search_size: Some(250),
            ..Default::default()
        };
        let registry = NpmRegistry::from_http_client(HttpClient::new(Client::new()), &config);
        let packages = registry.search("keywords:a").await.unwrap();

        mock.assert_async().await;
        assert!(packages.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_has_context() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/-/v1/search")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let registry = registry_for(&server.url());
        let err = registry.search("keywords:a").await.unwrap_err();
        assert!(err.to_string().contains("Package search failed"));
    }

    #[tokio::test]
    async fn test_package_metadata_scoped_name() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/@acme%2Ftrade-network")
            .with_status(200)
            .with_body(
                r#"{"name": "@acme/trade-network", "versions": {
                    "1.0.0": {"name": "@acme/trade-network", "version": "1.0.0",
                              "dist": {"tarball": "http://x/t.tgz"}}
                }}"#,
            )
            .create_async()
            .await;

        let registry = registry_for(&server.url());
        let metadata = registry
            .package_metadata("@acme/trade-network")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(metadata.name, "@acme/trade-network");
        assert!(metadata.versions.contains_key("1.0.0"));
    }

    #[tokio::test]
    async fn test_package_metadata_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let registry = registry_for(&server.url());
        let err = registry.package_metadata("missing").await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Failed to fetch metadata for package missing")
        );
    }

    #[tokio::test]
    async fn test_fetch_tarball_streams_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pkg/-/pkg-1.0.0.tgz")
            .with_status(200)
            .with_body("tarball bytes")
            .create_async()
            .await;

        let registry = registry_for(&server.url());
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        let sent = registry
            .fetch_tarball(&format!("{}/pkg/-/pkg-1.0.0.tgz", server.url()), tx)
            .await
            .unwrap();

        let mut body = Vec::new();
        while let Some(chunk) = rx.recv().await {
            body.extend(chunk);
        }
        assert_eq!(sent, 13);
        assert_eq!(body, b"tarball bytes");
    }
}
