use std::path::PathBuf;

use larder_types::AssetKey;
use snafu::{Location, Snafu};

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("failed to create cache dir {}", dir.display()))]
    CreateCacheDir {
        dir: PathBuf,
        #[snafu(implicit)]
        location: Location,
        source: std::io::Error,
    },

    #[snafu(display("cache store {name} could not be opened"))]
    StoreUnavailable {
        name: String,
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: object_store::Error,
    },

    #[snafu(display("cache store operation failed for {key}"))]
    StoreIo {
        key: AssetKey,
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: object_store::Error,
    },

    #[snafu(display("failed to list cache store {name}"))]
    StoreList {
        name: String,
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: object_store::Error,
    },

    #[snafu(display("failed to build the origin HTTP client"))]
    OriginClient {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: reqwest::Error,
    },

    #[snafu(display("cannot resolve {key} against origin base {base}"))]
    OriginUrl {
        key: AssetKey,
        base: String,
        #[snafu(implicit)]
        location: Location,
        source: url::ParseError,
    },

    #[snafu(display("origin request failed for {key}"))]
    OriginRequest {
        key: AssetKey,
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: reqwest::Error,
    },

    #[snafu(display("origin returned status {status} for {key}"))]
    OriginStatus {
        key: AssetKey,
        status: reqwest::StatusCode,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to populate cache entry {key}"))]
    PopulationFailed {
        key: AssetKey,
        #[snafu(implicit)]
        location: Location,
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
    },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::StoreIo { error, .. }
            if matches!(error, object_store::Error::NotFound { .. }))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
