//! Log setup for `vina-dock` and other hosts of the runner.
//!
//! The runner's job span and `job.*` events are only visible once a
//! subscriber is installed. Hosts that already install their own can skip
//! this module.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a stderr subscriber for runner events. `RUST_LOG` wins over
/// `level`; `json` switches to one JSON object per line. A second call is a
/// no-op.
///
/// Stdout is left to the front-end, which prints the tool's report there.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}
