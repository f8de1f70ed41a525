//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// The environment variable holding the log filter.
pub const LOG_ENV: &str = "DAYBOOK_LOG";

static INIT: Once = Once::new();

/// Initializes logging to stderr.
///
/// Reads the [`LOG_ENV`] environment variable for per-module log levels, e.g.
/// `DAYBOOK_LOG=daybook::build=debug,daybook::write=info`. Falls back to
/// `daybook=info` if it is not set or is invalid; `verbose` raises the
/// fallback to `daybook=debug`.
///
/// Calling this more than once has no further effect.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = match verbose {
            true => "daybook=debug",
            false => "daybook=info",
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
