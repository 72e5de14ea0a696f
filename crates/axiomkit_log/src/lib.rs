//! `axiomkit_log`:
//! `tracing` subscriber setup shared by axiomkit binaries.
//!
//! Log lines go to stderr so stdout stays free for program output. The filter
//! is read from `RUST_LOG`; when unset or invalid the caller's default
//! directive applies.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Environment variable holding the filter directives.
pub const C_ENV_LOG_FILTER: &str = "RUST_LOG";

/// Build the filter from `raw_filter`, falling back to `default_directive`.
pub fn derive_env_filter(raw_filter: Option<&str>, default_directive: &str) -> EnvFilter {
    raw_filter
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive))
}

/// Install the global stderr subscriber.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging(default_directive: &str) -> bool {
    let raw_filter = std::env::var(C_ENV_LOG_FILTER).ok();
    let env_filter = derive_env_filter(raw_filter.as_deref(), default_directive);

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}
