//! Console logging for the `datacleaner` binary.
//!
//! Lines carry a timestamp, level and target prefix. The filter comes from
//! `RUST_LOG` and defaults to `info`.
//!
//! ```no_run
//! datacleaner::logging::init();
//! tracing::info!("ready");
//! ```
//!
//! Library code only emits events; installing a subscriber is left to binaries.

use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Later calls keep the first one.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
    {
        tracing::debug!(%err, "Global subscriber already installed");
    }
}
