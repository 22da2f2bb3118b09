//! Logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`. Returns `false` when a global
/// subscriber was already installed.
pub fn init_logging(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .is_ok()
}
