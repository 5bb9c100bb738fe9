//! Logging utilities
//!
//! Provides logging setup and configuration.

/// Initialise `env_logger`, honouring `RUST_LOG` and falling back to `default_filter`.
///
/// Log records go to stderr so they never interleave with operator output.
pub fn setup_logging(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}
