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

use std::{path::Path, sync::Arc};

use object_store::ObjectStore;

pub type BlobStore = Arc<dyn ObjectStore>;

pub type BlobStoreError = object_store::Error;

pub type StorePath = object_store::path::Path;

pub fn is_not_found_error(e: &BlobStoreError) -> bool {
    matches!(e, BlobStoreError::NotFound { .. })
}

pub fn new_memory_blob_store() -> BlobStore {
    Arc::new(object_store::memory::InMemory::new())
}

/// Open a blob store rooted at an existing local directory. The caller is
/// responsible for creating the directory first.
pub fn new_local_blob_store<P: AsRef<Path>>(path: P) -> Result<BlobStore, BlobStoreError> {
    let store: Arc<dyn ObjectStore> = Arc::new(
        object_store::local::LocalFileSystem::new_with_prefix(path.as_ref())?,
    );
    Ok(store)
}
