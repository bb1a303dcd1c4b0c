//! Diagnostic logging set-up.
//!
//! Replies go to stdout, so diagnostics are written to stderr and stay quiet
//! unless `RUST_LOG` asks for more (e.g. `RUST_LOG=arkchat=debug`).

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
