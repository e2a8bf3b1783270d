//! Logging setup for the command-line binary
//!
//! Installs a `tracing-subscriber` fmt layer on stderr; stdout is reserved for
//! the balance CSV. `RUST_LOG` takes precedence over the filter passed in.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber
///
/// `default_filter` is an `EnvFilter` directive such as `"warn"` or
/// `"info,notification=off"`, used when `RUST_LOG` is unset or invalid.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}
