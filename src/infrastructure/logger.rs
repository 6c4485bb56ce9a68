//! Logging setup for the calltree CLI.
//!
//! `--verbose` turns on debug output for this crate, `--quiet` limits it to
//! errors, and otherwise `RUST_LOG` is honored with an info-level fallback.
//! Logs go to stderr so DOT or JSON on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("calltree=debug")
    } else if quiet {
        EnvFilter::new("calltree=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("calltree=info"))
    };

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
