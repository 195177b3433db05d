use serde::{Deserialize, Serialize};

use crate::key::{AssetKey, Error};

/// The ordered set of assets to pre-populate at install time.
///
/// Fixed per deployment build; duplicates collapse to their first
/// occurrence so re-listing an asset cannot make install fetch it twice.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Manifest {
    entries: Vec<AssetKey>,
}

impl Manifest {
    pub fn new<I: IntoIterator<Item = AssetKey>>(keys: I) -> Self {
        let mut entries: Vec<AssetKey> = Vec::new();
        for key in keys {
            if !entries.contains(&key) {
                entries.push(key);
            }
        }
        Manifest { entries }
    }

    /// Parse raw path strings, normalizing each entry.
    pub fn parse<I, S>(paths: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = paths
            .into_iter()
            .map(AssetKey::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Manifest::new(keys))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetKey> {
        self.entries.iter()
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<String>> for Manifest {
    type Error = Error;

    fn try_from(paths: Vec<String>) -> Result<Self, Self::Error> {
        Manifest::parse(paths)
    }
}

impl From<Manifest> for Vec<String> {
    fn from(manifest: Manifest) -> Self {
        manifest
            .entries
            .into_iter()
            .map(|key| key.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_and_dedups() {
        let manifest = Manifest::parse(["./", "./index.html", "/index.html", "app.js"]).unwrap();
        let entries: Vec<_> = manifest.iter().map(|k| k.as_str()).collect();
        assert_eq!(entries, vec!["/", "/index.html", "/app.js"]);
    }

    #[test]
    fn order_is_preserved() {
        let manifest = Manifest::parse(["/b", "/a", "/c"]).unwrap();
        let entries: Vec<_> = manifest.iter().map(|k| k.as_str()).collect();
        assert_eq!(entries, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn bad_entry_fails_the_whole_manifest() {
        assert!(Manifest::parse(["/", ""]).is_err());
    }
}
