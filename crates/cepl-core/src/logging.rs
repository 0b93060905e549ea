//! Process-wide `tracing` subscriber setup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static LOG_INIT_ONCE: Once = Once::new();

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Only the first call does anything. If another global subscriber is
/// already installed it is left in place.
pub fn init() {
    LOG_INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
        if let Err(err) = installed {
            tracing::debug!("tracing subscriber already set: {err}");
        }
    });
}
