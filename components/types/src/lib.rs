pub mod blob;
pub mod key;
pub mod manifest;

pub use blob::{Blob, BlobSource};
pub use key::AssetKey;
pub use manifest::Manifest;
