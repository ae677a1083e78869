//! Tracing subscriber setup for the command-line tool

use crate::io::configuration::{DEFAULT_LOG_FILTER, QUIET_LOG_FILTER};
use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set
pub const fn default_filter(quiet: bool) -> &'static str {
    if quiet { QUIET_LOG_FILTER } else { DEFAULT_LOG_FILTER }
}

/// Install a stderr fmt subscriber filtered by `RUST_LOG` or the default filter
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(quiet: bool) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
