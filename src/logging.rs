//! Tracing subscriber setup for the binary.
//!
//! The library only emits `tracing` events.  Log lines go to stderr so
//! they never mix with command output, and they never carry secret values.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise passvault logs at `warn`, or at
/// `debug` when `verbose` is on.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("passvault={level},warn")));

    // A second init (e.g. in tests) is harmless, so the error is ignored.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
