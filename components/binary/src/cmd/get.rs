use std::{io::Write, path::PathBuf, sync::Arc};

use clap::Args;
use larder_storage::{AssetCacheProxyBuilder, OriginRef};
use larder_types::AssetKey;
use larder_utils::logger::init_logging;
use snafu::{ResultExt, Whatever};
use tracing::info;

use crate::cmd::runtime;
use crate::config::DeployConfig;

const DEPLOY_OPTIONS_HEADER: &str = "Deploy options";
const LOGGING_OPTIONS_HEADER: &str = "Logging options";

#[derive(Debug, Clone, Args)]
#[command(long_about = r"

Serve one asset: from the cache store when present, from the origin
otherwise. The payload goes to stdout unless --output is given.
Examples:

larder get /index.html
larder get --config deploy.toml -o page.html /index.html
")]
pub struct GetArgs {
    #[arg(help = "Asset key to serve, e.g. /index.html", value_name = "KEY")]
    pub key: String,

    #[arg(
    short,
    long,
    help = "Write the payload to a file instead of stdout",
    value_name = "FILE"
    )]
    pub output: Option<PathBuf>,

    #[arg(
    long,
    help = "Deployment file (TOML); defaults to the built-in debug deployment",
    help_heading = DEPLOY_OPTIONS_HEADER,
    value_name = "FILE"
    )]
    pub config: Option<PathBuf>,

    #[clap(
    short,
    long,
    help = "Log level",
    help_heading = LOGGING_OPTIONS_HEADER,
    value_name = "LEVEL",
    default_value = "info"
    )]
    pub level: String,
}

impl GetArgs {
    pub fn run(self) -> Result<(), Whatever> {
        init_logging(&self.level)?;
        let config = DeployConfig::load(self.config.as_deref())?;
        let key = AssetKey::parse(&self.key).whatever_context("invalid asset key")?;
        let runtime = runtime()?;
        runtime.block_on(async {
            let origin: OriginRef = Arc::new(config.http_origin()?);
            let proxy = AssetCacheProxyBuilder::new(origin)
                .with_config(config.store_config())
                .with_manifest(config.assets.clone())
                .build()
                .whatever_context("failed to open the cache store")?;
            proxy
                .recover()
                .await
                .whatever_context("failed to recover the cache index")?;
            let blob = proxy
                .serve(&key)
                .await
                .whatever_context(format!("failed to serve {key}"))?;
            info!("{} ({} bytes) served from {:?}", key, blob.len(), blob.source);
            match &self.output {
                Some(path) => std::fs::write(path, &blob.payload)
                    .whatever_context(format!("failed to write {}", path.display()))?,
                None => std::io::stdout()
                    .lock()
                    .write_all(&blob.payload)
                    .whatever_context("failed to write the payload to stdout")?,
            }
            Ok(())
        })
    }
}
