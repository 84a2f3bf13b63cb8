//! Logging initialization.
//!
//! Diagnostics go to stderr so stdout stays clean for the result output.

use tracing_subscriber::EnvFilter;

/// Initialize tracing to stderr, honoring `RUST_LOG` and defaulting to
/// `info`.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
