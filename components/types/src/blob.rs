use bytes::Bytes;

/// Which side of the cache produced a blob.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BlobSource {
    /// Returned from the durable store, no network involved.
    Cache,
    /// Fetched live from the origin on a cache miss.
    Origin,
}

/// An opaque response payload together with where it came from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Blob {
    pub payload: Bytes,
    pub source: BlobSource,
}

impl Blob {
    pub fn cached(payload: Bytes) -> Self {
        Blob {
            payload,
            source: BlobSource::Cache,
        }
    }

    pub fn fetched(payload: Bytes) -> Self {
        Blob {
            payload,
            source: BlobSource::Origin,
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
