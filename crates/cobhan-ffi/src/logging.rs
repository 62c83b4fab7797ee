//! Log subscriber for hosts that load the library without a Rust runtime of
//! their own.

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install a compact stderr subscriber unless one is already set.
pub(crate) fn init(debug: bool) {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    let installed = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Cobhan logging initialised at {}", log_level);
    }
}
