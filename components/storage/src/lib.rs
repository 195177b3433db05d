//! A read-through cache for a fixed set of assets.
//!
//! One named durable store holds asset payloads keyed by URL path. At
//! install time the store is populated from a manifest by fetching every
//! entry from the origin; afterwards each serve request answers from the
//! store when it can and passes through to the origin when it cannot.
//!
//! ## Key components
//! 1. [`store::CacheStore`]: the durable key→blob store plus its memory
//!    index, recoverable from a directory listing after a restart.
//! 2. [`origin::Origin`]: the seam to the underlying network, with an
//!    HTTP implementation.
//! 3. [`proxy::AssetCacheProxy`]: install-time population and the
//!    hit-or-pass-through serve path.

pub mod err;
pub mod origin;
pub mod proxy;
pub mod store;

pub use err::{Error, Result};
pub use origin::{HttpOrigin, Origin, OriginRef};
pub use proxy::{AssetCacheProxy, AssetCacheProxyBuilder, ProxyState};
pub use store::{CacheStore, Config, Lookup};
