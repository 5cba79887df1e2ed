//! Logging setup
//!
//! Console output, configurable via the `RUST_LOG` environment variable
//! with a caller-supplied default when it is unset.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// `default_directives` is used when `RUST_LOG` is not set, e.g. `"info"`.
/// Safe to call once per process; later calls are ignored.
pub fn init(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
