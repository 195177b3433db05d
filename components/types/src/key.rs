use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use snafu::{ensure, Location, Snafu};

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("asset key must not be empty"))]
    EmptyAssetKey {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("invalid encoded asset name {name}"))]
    InvalidAssetName {
        name: String,
        #[snafu(implicit)]
        location: Location,
    },
}

/// The identity of one cacheable asset: an absolute URL path such as `/`
/// or `/index.html`.
///
/// Manifests generated alongside a site root commonly list entries
/// relative to it (`./`, `./index.html`); parsing normalizes those to the
/// absolute form so the same asset never appears under two spellings.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetKey(String);

impl AssetKey {
    pub fn parse<S: AsRef<str>>(raw: S) -> Result<Self, Error> {
        let raw = raw.as_ref();
        ensure!(!raw.is_empty(), EmptyAssetKeySnafu);
        let rest = raw.strip_prefix("./").unwrap_or(raw);
        if rest.starts_with('/') {
            Ok(AssetKey(rest.to_string()))
        } else {
            Ok(AssetKey(format!("/{}", rest)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode the key as a single flat file name, so a store directory can
    /// be listed and decoded back into keys after a restart. Bytes outside
    /// `[A-Za-z0-9._-]` become `%XX`.
    pub fn storage_name(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        for b in self.0.bytes() {
            if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-') {
                out.push(b as char);
            } else {
                out.push_str(&format!("%{:02X}", b));
            }
        }
        out
    }

    /// Decode a file name produced by [`AssetKey::storage_name`].
    pub fn from_storage_name(name: &str) -> Result<Self, Error> {
        let bytes = name.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'%' {
                let (hi, lo) = match (
                    bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                    bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
                ) {
                    (Some(hi), Some(lo)) => (hi as u8, lo as u8),
                    _ => return InvalidAssetNameSnafu { name }.fail(),
                };
                out.push(hi << 4 | lo);
                i += 3;
            } else {
                out.push(bytes[i]);
                i += 1;
            }
        }
        let decoded = String::from_utf8(out).map_err(|_| {
            InvalidAssetNameSnafu { name }.build()
        })?;
        ensure!(decoded.starts_with('/'), InvalidAssetNameSnafu { name });
        Ok(AssetKey(decoded))
    }
}

impl Display for AssetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetKey::parse(s)
    }
}

impl TryFrom<&str> for AssetKey {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        AssetKey::parse(s)
    }
}

impl TryFrom<String> for AssetKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        AssetKey::parse(&s)
    }
}

impl From<AssetKey> for String {
    fn from(key: AssetKey) -> Self {
        key.0
    }
}
