use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Installs the JSON log subscriber. `RUST_LOG` wins over the debug flag.
pub fn init(debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "info,paprika_bot=debug"
    } else {
        "info"
    }
}
