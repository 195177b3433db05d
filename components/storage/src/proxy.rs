// Copyright 2025 larder
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::atomic::{AtomicBool, Ordering};

use larder_types::{AssetKey, Blob, Manifest};
use snafu::ResultExt;
use tracing::debug;

use crate::{
    err::{PopulationFailedSnafu, Result},
    origin::OriginRef,
    store::{CacheStore, Config, Lookup},
};

/// Whether a proxy has completed a successful install in this process.
///
/// Serving never depends on this: a store reopened after a restart answers
/// hits (once recovered) while the proxy reports `Uninitialized`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ProxyState {
    Uninitialized,
    Ready,
}

pub struct AssetCacheProxyBuilder {
    config: Config,
    manifest: Manifest,
    origin: OriginRef,
}

impl AssetCacheProxyBuilder {
    pub fn new(origin: OriginRef) -> Self {
        Self {
            config: Config::default(),
            manifest: Manifest::default(),
            origin,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn build(self) -> Result<AssetCacheProxy> {
        let store = CacheStore::open(self.config)?;
        Ok(AssetCacheProxy::from_parts(store, self.origin, self.manifest))
    }

    /// Build on a volatile store, for tests and dry runs.
    pub fn build_in_memory(self) -> AssetCacheProxy {
        let store = CacheStore::open_in_memory(&self.config.name);
        AssetCacheProxy::from_parts(store, self.origin, self.manifest)
    }
}

/// Serves a fixed set of assets from a durable store, falling back to the
/// origin, and populates that store from the manifest at install time.
pub struct AssetCacheProxy {
    store: CacheStore,
    origin: OriginRef,
    manifest: Manifest,
    ready: AtomicBool,
}

impl AssetCacheProxy {
    fn from_parts(store: CacheStore, origin: OriginRef, manifest: Manifest) -> Self {
        Self {
            store,
            origin,
            manifest,
            ready: AtomicBool::new(false),
        }
    }

    /// Fetch every manifest entry from the origin and write it into the
    /// store, in manifest order. The future resolves only once all entries
    /// are written or one of them has failed; the host is expected to
    /// await it before treating installation as complete.
    ///
    /// The first failing entry aborts the run and surfaces as
    /// [`crate::Error::PopulationFailed`]. Entries written before the
    /// failure stay in the store and remain servable. No retries.
    pub async fn install(&self) -> Result<()> {
        debug!(
            "installing {} manifest entries into cache store {}",
            self.manifest.len(),
            self.store.name()
        );
        for key in self.manifest.iter() {
            let payload = self
                .origin
                .fetch(key)
                .await
                .context(PopulationFailedSnafu { key: key.clone() })?;
            self.store
                .insert(key, payload)
                .await
                .context(PopulationFailedSnafu { key: key.clone() })?;
        }
        self.ready.store(true, Ordering::Release);
        debug!("cache store {} populated", self.store.name());
        Ok(())
    }

    /// Answer one fetch event: the stored blob when present, otherwise the
    /// origin's result passed through verbatim.
    ///
    /// Stored entries are never revalidated or expired here, and a miss is
    /// not written back. Concurrent misses for the same key each reach the
    /// origin independently; callers that need request coalescing must
    /// provide it themselves.
    pub async fn serve(&self, key: &AssetKey) -> Result<Blob> {
        match self.store.lookup(key).await? {
            Lookup::Hit(payload) => Ok(Blob::cached(payload)),
            Lookup::Miss => {
                let payload = self.origin.fetch(key).await?;
                Ok(Blob::fetched(payload))
            }
        }
    }

    /// Re-index the durable store after a restart. Leaves the install
    /// state untouched.
    pub async fn recover(&self) -> Result<usize> {
        self.store.recover().await
    }

    pub fn state(&self) -> ProxyState {
        if self.ready.load(Ordering::Acquire) {
            ProxyState::Ready
        } else {
            ProxyState::Uninitialized
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;
    use bytes::Bytes;
    use larder_types::BlobSource;
    use larder_utils::logger::install_fmt_log;

    use super::*;
    use crate::{err::OriginStatusSnafu, origin::Origin, Error};

    fn key(s: &str) -> AssetKey {
        AssetKey::parse(s).unwrap()
    }

    fn app_manifest() -> Manifest {
        Manifest::parse(["/", "/index.html", "/app.js", "/app.wasm"]).unwrap()
    }

    fn payload_for(key: &AssetKey) -> Bytes {
        Bytes::from(format!("origin payload for {key}"))
    }

    /// An origin that counts every fetch and can be told to fail one key.
    #[derive(Debug, Default)]
    struct ScriptedOrigin {
        calls: AtomicUsize,
        fail_key: Option<AssetKey>,
    }

    impl ScriptedOrigin {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn failing_on(key: AssetKey) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_key: Some(key),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Origin for ScriptedOrigin {
        async fn fetch(&self, key: &AssetKey) -> Result<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_key.as_ref() == Some(key) {
                return OriginStatusSnafu {
                    key: key.clone(),
                    status: reqwest::StatusCode::BAD_GATEWAY,
                }
                .fail();
            }
            Ok(payload_for(key))
        }
    }

    fn proxy_with(origin: Arc<ScriptedOrigin>, manifest: Manifest) -> AssetCacheProxy {
        AssetCacheProxyBuilder::new(origin)
            .with_manifest(manifest)
            .build_in_memory()
    }

    #[tokio::test]
    async fn install_then_serve_answers_from_cache() {
        install_fmt_log();
        let origin = ScriptedOrigin::new();
        let proxy = proxy_with(origin.clone(), app_manifest());

        assert_eq!(proxy.state(), ProxyState::Uninitialized);
        proxy.install().await.unwrap();
        assert_eq!(proxy.state(), ProxyState::Ready);
        assert_eq!(origin.calls(), 4);

        for k in app_manifest().iter() {
            let blob = proxy.serve(k).await.unwrap();
            assert_eq!(blob.source, BlobSource::Cache);
            assert_eq!(blob.payload, payload_for(k));
        }
        // every hit answered without touching the origin
        assert_eq!(origin.calls(), 4);
    }

    #[tokio::test]
    async fn install_writes_exactly_the_manifest() {
        let origin = ScriptedOrigin::new();
        let proxy = proxy_with(origin, app_manifest());

        proxy.install().await.unwrap();

        let mut expected = vec![key("/"), key("/index.html"), key("/app.js"), key("/app.wasm")];
        expected.sort();
        assert_eq!(proxy.store().keys(), expected);
    }

    #[tokio::test]
    async fn install_is_idempotent() {
        let origin = ScriptedOrigin::new();
        let proxy = proxy_with(origin.clone(), app_manifest());

        proxy.install().await.unwrap();
        let first = proxy.store().keys();
        proxy.install().await.unwrap();

        assert_eq!(proxy.store().keys(), first);
        assert_eq!(proxy.store().len(), 4);
        // the second install re-fetched and overwrote, it did not duplicate
        assert_eq!(origin.calls(), 8);
        for k in app_manifest().iter() {
            let blob = proxy.serve(k).await.unwrap();
            assert_eq!(blob.payload, payload_for(k));
        }
    }

    #[tokio::test]
    async fn miss_passes_through_without_write_back() {
        let origin = ScriptedOrigin::new();
        let proxy = proxy_with(origin.clone(), Manifest::default());
        let k = key("/uncached.css");

        let blob = proxy.serve(&k).await.unwrap();
        assert_eq!(blob.source, BlobSource::Origin);
        assert_eq!(blob.payload, payload_for(&k));
        assert_eq!(origin.calls(), 1);
        assert!(proxy.store().is_empty());

        // still a miss the second time
        let blob = proxy.serve(&k).await.unwrap();
        assert_eq!(blob.source, BlobSource::Origin);
        assert_eq!(origin.calls(), 2);
    }

    #[tokio::test]
    async fn miss_forwards_origin_failure() {
        let k = key("/uncached.css");
        let origin = ScriptedOrigin::failing_on(k.clone());
        let proxy = proxy_with(origin.clone(), Manifest::default());

        match proxy.serve(&k).await.unwrap_err() {
            Error::OriginStatus { key: failed, status, .. } => {
                assert_eq!(failed, k);
                assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(origin.calls(), 1);
    }

    #[tokio::test]
    async fn failed_install_keeps_earlier_entries() {
        install_fmt_log();
        let origin = ScriptedOrigin::failing_on(key("/app.wasm"));
        let proxy = proxy_with(origin.clone(), app_manifest());

        match proxy.install().await.unwrap_err() {
            Error::PopulationFailed { key: failed, .. } => {
                assert_eq!(failed, key("/app.wasm"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(proxy.state(), ProxyState::Uninitialized);
        assert_eq!(origin.calls(), 4);

        // entries written before the failure serve without the origin,
        // regardless of the overall install outcome
        let blob = proxy.serve(&key("/")).await.unwrap();
        assert_eq!(blob.source, BlobSource::Cache);
        assert_eq!(blob.payload, payload_for(&key("/")));
        assert_eq!(origin.calls(), 4);

        assert!(!proxy.store().contains(&key("/app.wasm")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_misses_fetch_independently() {
        let origin = ScriptedOrigin::new();
        let proxy = proxy_with(origin.clone(), Manifest::default());
        let k = key("/uncached.css");

        let (a, b, c) = tokio::join!(proxy.serve(&k), proxy.serve(&k), proxy.serve(&k));
        for blob in [a.unwrap(), b.unwrap(), c.unwrap()] {
            assert_eq!(blob.source, BlobSource::Origin);
            assert_eq!(blob.payload, payload_for(&k));
        }
        // no coalescing: every concurrent miss reached the origin
        assert_eq!(origin.calls(), 3);
    }

    #[tokio::test]
    async fn serve_before_install_is_passthrough() {
        let origin = ScriptedOrigin::new();
        let proxy = proxy_with(origin.clone(), app_manifest());

        let blob = proxy.serve(&key("/index.html")).await.unwrap();
        assert_eq!(blob.source, BlobSource::Origin);
        assert_eq!(origin.calls(), 1);
        assert_eq!(proxy.state(), ProxyState::Uninitialized);
    }
}
