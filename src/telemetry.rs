//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Installs the process-wide subscriber.
///
/// Logs go to stderr so they never mix with dialog output on stdout.
/// Level comes from `RUST_LOG` (default `warn`). Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
