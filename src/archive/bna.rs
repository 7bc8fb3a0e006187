//! Business network archive parsing.
//!
//! A business network archive is a zip file holding the network's
//! `package.json`, its model files (`.cto`), transaction processor scripts
//! (`.js` under `lib/`), an optional `permissions.acl` and an optional
//! `queries.qry`.

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::Deserialize;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use super::ArchiveParser;

const PACKAGE_JSON: &str = "package.json";
const PERMISSIONS_ACL: &str = "permissions.acl";
const QUERIES_QRY: &str = "queries.qry";

#[derive(Deserialize)]
struct PackageJson {
    name: String,
    version: String,
    #[serde(default)]
    description: Option<String>,
}

/// The structured contents of one business network archive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkDefinition {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub models: Vec<String>,
    pub scripts: Vec<String>,
    pub has_acl: bool,
    pub has_queries: bool,
}

impl NetworkDefinition {
    /// `name@version`, the identifier a business network is deployed under.
    pub fn identifier(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// Default [`ArchiveParser`] reading the archive layout directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct BusinessNetworkParser;

impl ArchiveParser for BusinessNetworkParser {
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn parse(&self, bytes: &[u8]) -> Result<NetworkDefinition> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .context("Business network archive is not a valid zip file")?;

        let names: Vec<String> = archive.file_names().map(String::from).collect();
        debug!("Archive contains {} entries", names.len());

        let package_json: PackageJson = {
            let mut file = archive
                .by_name(PACKAGE_JSON)
                .map_err(|_| anyhow!("Business network archive has no {}", PACKAGE_JSON))?;
            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .with_context(|| format!("Failed to read {}", PACKAGE_JSON))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid {} in business network archive", PACKAGE_JSON))?
        };

        let mut models: Vec<String> = names
            .iter()
            .filter(|n| n.ends_with(".cto"))
            .cloned()
            .collect();
        models.sort();

        let mut scripts: Vec<String> = names
            .iter()
            .filter(|n| n.starts_with("lib/") && n.ends_with(".js"))
            .cloned()
            .collect();
        scripts.sort();

        Ok(NetworkDefinition {
            name: package_json.name,
            version: package_json.version,
            description: package_json.description,
            models,
            scripts,
            has_acl: names.iter().any(|n| n == PERMISSIONS_ACL),
            has_queries: names.iter().any(|n| n == QUERIES_QRY),
        })
    }
}
