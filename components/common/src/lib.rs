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

pub const LARDER: &str = "larder";

/// Changing the store name is the only supported way to invalidate a
/// previously installed cache; the old directory is simply orphaned.
pub const DEFAULT_CACHE_NAME: &str = "larder-assets-v1";

pub const DEFAULT_CACHE_DIR: &str = "/tmp/larder.cache";

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8080/";

/// The asset set a freshly generated deployment ships with: the root
/// document, the entry page, the app bundle and its wasm payload.
pub const DEFAULT_ASSETS: [&str; 4] = ["/", "/index.html", "/app.js", "/app.wasm"];
