use std::path::PathBuf;

use clap::Args;
use larder_storage::CacheStore;
use larder_utils::logger::init_logging;
use snafu::{ResultExt, Whatever};

use crate::cmd::runtime;
use crate::config::DeployConfig;

const DEPLOY_OPTIONS_HEADER: &str = "Deploy options";
const LOGGING_OPTIONS_HEADER: &str = "Logging options";

#[derive(Debug, Clone, Args)]
#[command(long_about = r"

List what a deployment's cache store currently holds.
")]
pub struct StatusArgs {
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
    default_value = "warn"
    )]
    pub level: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<(), Whatever> {
        init_logging(&self.level)?;
        let config = DeployConfig::load(self.config.as_deref())?;
        let store = CacheStore::open(config.store_config())
            .whatever_context("failed to open the cache store")?;
        let runtime = runtime()?;
        runtime
            .block_on(store.recover())
            .whatever_context("failed to recover the cache index")?;

        println!("cache store {} ({} entries)", store.name(), store.len());
        for key in store.keys() {
            println!("{:>10}  {}", store.size_of(&key).unwrap_or(0), key);
        }
        Ok(())
    }
}
