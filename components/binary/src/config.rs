use std::path::{Path, PathBuf};

use larder_storage::{Config as StoreConfig, HttpOrigin};
use larder_types::Manifest;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Whatever};
use url::Url;

/// One deployment of the cache: which store it fills, where the assets
/// come from, and which assets to pre-populate.
///
/// ```toml
/// name = "egui-template-pwa"
/// origin = "https://example.github.io/app/"
/// assets = ["./", "./index.html", "./app.js", "./app_bg.wasm"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub name: String,
    pub cache_dir: PathBuf,
    pub origin: String,
    pub assets: Manifest,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            name: larder_common::DEFAULT_CACHE_NAME.to_string(),
            cache_dir: PathBuf::from(larder_common::DEFAULT_CACHE_DIR),
            origin: larder_common::DEFAULT_ORIGIN.to_string(),
            assets: Manifest::parse(larder_common::DEFAULT_ASSETS)
                .expect("default manifest is valid"),
        }
    }
}

impl DeployConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, Whatever> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .whatever_context(format!("failed to read deploy config {}", path.display()))?;
        toml::from_str(&raw)
            .whatever_context(format!("failed to parse deploy config {}", path.display()))
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            cache_dir: self.cache_dir.clone(),
            name: self.name.clone(),
        }
    }

    pub fn http_origin(&self) -> Result<HttpOrigin, Whatever> {
        let base = Url::parse(&self.origin)
            .whatever_context(format!("invalid origin url {}", self.origin))?;
        HttpOrigin::new(base).whatever_context("failed to build the origin client")
    }
}
