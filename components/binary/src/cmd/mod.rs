pub mod get;
pub mod install;
pub mod status;

use snafu::{ResultExt, Whatever};

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, Whatever> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .whatever_context("failed to build the async runtime")
}
