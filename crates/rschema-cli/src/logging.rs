use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter; overrides `--log-level`.
pub const LOG_ENV: &str = "RSCHEMA_LOG";

/// Install the global subscriber. Logs go to stderr so stdout stays parseable.
pub fn init(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_new(level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
