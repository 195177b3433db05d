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

use std::{path::PathBuf, time::Instant};

use bytes::Bytes;
use dashmap::DashMap;
use futures::TryStreamExt;
use larder_types::AssetKey;
use larder_utils::blob_store::{is_not_found_error, BlobStore, StorePath};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tracing::{debug, warn};

use crate::err::{CreateCacheDirSnafu, Result, StoreIoSnafu, StoreListSnafu, StoreUnavailableSnafu};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The directory under which every named store lives.
    pub cache_dir: PathBuf,
    /// The store name. A new name starts an empty store and orphans the
    /// old directory.
    pub name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(larder_common::DEFAULT_CACHE_DIR),
            name: larder_common::DEFAULT_CACHE_NAME.to_string(),
        }
    }
}

/// Outcome of a store lookup.
#[derive(Debug)]
pub enum Lookup {
    Hit(Bytes),
    Miss,
}

#[derive(Debug, Clone)]
struct IndexValue {
    size: usize,
}

/// A named durable key→blob store.
///
/// Blobs live as flat files under `<cache_dir>/<name>/`, one per asset,
/// named by the key's storage encoding. A memory index fronts the
/// directory; only indexed keys can hit, so a reopened store answers
/// nothing until [`CacheStore::recover`] has re-read the listing.
pub struct CacheStore {
    name: String,
    store: BlobStore,
    index: DashMap<AssetKey, IndexValue>,
}

impl CacheStore {
    pub fn open(config: Config) -> Result<Self> {
        let dir = config.cache_dir.join(&config.name);
        std::fs::create_dir_all(&dir).context(CreateCacheDirSnafu { dir: dir.clone() })?;
        let store = larder_utils::blob_store::new_local_blob_store(&dir)
            .context(StoreUnavailableSnafu { name: config.name.clone() })?;
        debug!("opened cache store {} at {:?}", config.name, dir);
        Ok(Self {
            name: config.name,
            store,
            index: DashMap::new(),
        })
    }

    /// A volatile store, handy for tests and dry runs.
    pub fn open_in_memory<S: AsRef<str>>(name: S) -> Self {
        Self {
            name: name.as_ref().to_string(),
            store: larder_utils::blob_store::new_memory_blob_store(),
            index: DashMap::new(),
        }
    }

    /// Rebuild the memory index from the store's directory listing.
    /// Entries whose names do not decode back to a key are skipped with a
    /// warning. Returns the number of indexed entries.
    pub async fn recover(&self) -> Result<usize> {
        let start = Instant::now();
        let mut listing = self.store.list(None);
        let mut recovered = 0;
        while let Some(meta) = listing
            .try_next()
            .await
            .context(StoreListSnafu { name: self.name.clone() })?
        {
            let Some(file_name) = meta.location.filename() else {
                continue;
            };
            let key = match AssetKey::from_storage_name(file_name) {
                Ok(key) => key,
                Err(e) => {
                    warn!("invalid cache file name {:?}: {}", file_name, e);
                    continue;
                }
            };
            self.index.insert(key, IndexValue { size: meta.size });
            recovered += 1;
        }
        debug!(
            "recovered cache store {}, num_keys: {}, cost: {:?}",
            self.name,
            recovered,
            start.elapsed()
        );
        Ok(recovered)
    }

    /// Look a key up. An indexed key whose backing file has vanished drops
    /// its index entry and reports a miss.
    pub async fn lookup(&self, key: &AssetKey) -> Result<Lookup> {
        if !self.index.contains_key(key) {
            return Ok(Lookup::Miss);
        }
        match self.store.get(&Self::blob_path(key)).await {
            Ok(result) => {
                let payload = result
                    .bytes()
                    .await
                    .context(StoreIoSnafu { key: key.clone() })?;
                Ok(Lookup::Hit(payload))
            }
            Err(e) if is_not_found_error(&e) => {
                self.index.remove(key);
                Ok(Lookup::Miss)
            }
            Err(e) => Err(e).context(StoreIoSnafu { key: key.clone() }),
        }
    }

    /// Write a blob under `key`, replacing any previous value.
    pub async fn insert(&self, key: &AssetKey, payload: Bytes) -> Result<()> {
        let size = payload.len();
        self.store
            .put(&Self::blob_path(key), payload)
            .await
            .context(StoreIoSnafu { key: key.clone() })?;
        self.index.insert(key.clone(), IndexValue { size });
        Ok(())
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.index.contains_key(key)
    }

    /// All indexed keys, sorted.
    pub fn keys(&self) -> Vec<AssetKey> {
        let mut keys: Vec<_> = self.index.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn size_of(&self, key: &AssetKey) -> Option<usize> {
        self.index.get(key).map(|e| e.size)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn blob_path(key: &AssetKey) -> StorePath {
        StorePath::from(key.storage_name())
    }
}
