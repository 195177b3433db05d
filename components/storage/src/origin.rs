use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use larder_types::AssetKey;
use snafu::{ensure, ResultExt};
use tracing::debug;
use url::Url;

use crate::err::{
    OriginClientSnafu, OriginRequestSnafu, OriginStatusSnafu, OriginUrlSnafu, Result,
};

pub type OriginRef = Arc<dyn Origin>;

/// The underlying network an asset comes from when the cache cannot
/// answer. Implementations do not retry; whatever they produce is handed
/// back to the caller unchanged.
#[async_trait]
pub trait Origin: Send + Sync + Debug + 'static {
    async fn fetch(&self, key: &AssetKey) -> Result<Bytes>;
}

/// An origin reached over HTTP: `GET <base><key>`.
#[derive(Debug, Clone)]
pub struct HttpOrigin {
    base: Url,
    client: reqwest::Client,
}

impl HttpOrigin {
    pub fn new(base: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context(OriginClientSnafu)?;
        Ok(Self { base, client })
    }

    pub fn with_client(base: Url, client: reqwest::Client) -> Self {
        Self { base, client }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

/// Resolve a key against the origin base. Keys are absolute paths; they
/// join as relative references so a base below the host root keeps its
/// prefix.
fn resolve(base: &Url, key: &AssetKey) -> std::result::Result<Url, url::ParseError> {
    base.join(key.as_str().trim_start_matches('/'))
}

#[async_trait]
impl Origin for HttpOrigin {
    async fn fetch(&self, key: &AssetKey) -> Result<Bytes> {
        let url = resolve(&self.base, key).context(OriginUrlSnafu {
            key: key.clone(),
            base: self.base.to_string(),
        })?;
        debug!("fetching {} from origin", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context(OriginRequestSnafu { key: key.clone() })?;
        ensure!(
            response.status().is_success(),
            OriginStatusSnafu {
                key: key.clone(),
                status: response.status(),
            }
        );
        response
            .bytes()
            .await
            .context(OriginRequestSnafu { key: key.clone() })
    }
}
