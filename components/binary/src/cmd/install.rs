use std::{path::PathBuf, sync::Arc};

use clap::Args;
use larder_storage::{AssetCacheProxyBuilder, OriginRef};
use larder_utils::logger::init_logging;
use snafu::{ResultExt, Whatever};
use tracing::info;

use crate::cmd::runtime;
use crate::config::DeployConfig;

const DEPLOY_OPTIONS_HEADER: &str = "Deploy options";
const LOGGING_OPTIONS_HEADER: &str = "Logging options";

#[derive(Debug, Clone, Args)]
#[command(long_about = r"

Populate the cache store from the deployment manifest.
Examples:

# Install the built-in debug deployment
larder install

# Install a deployment file
larder install --config deploy.toml
")]
pub struct InstallArgs {
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

impl InstallArgs {
    pub fn run(self) -> Result<(), Whatever> {
        init_logging(&self.level)?;
        let config = DeployConfig::load(self.config.as_deref())?;
        let runtime = runtime()?;
        runtime.block_on(async {
            let origin: OriginRef = Arc::new(config.http_origin()?);
            let proxy = AssetCacheProxyBuilder::new(origin)
                .with_config(config.store_config())
                .with_manifest(config.assets.clone())
                .build()
                .whatever_context("failed to open the cache store")?;
            proxy
                .install()
                .await
                .whatever_context("failed to populate the cache")?;
            info!(
                "installed {} assets into cache store {}",
                proxy.manifest().len(),
                proxy.store().name()
            );
            Ok(())
        })
    }
}
