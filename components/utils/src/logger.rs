use snafu::Whatever;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;

/// Initialize logging to stderr.
///
/// The log level comes from the `RUST_LOG` environment variable, falling
/// back to `default_log_level` when it is unset or unparsable.
pub fn init_logging(default_log_level: &str) -> Result<(), Whatever> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_log_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
    tracing::info!("logging started");

    Ok(())
}

/// Install a plain fmt subscriber for tests. Safe to call more than once;
/// later calls are no-ops.
pub fn install_fmt_log() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
