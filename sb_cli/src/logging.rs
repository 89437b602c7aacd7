//! Structured logging configuration.
//!
//! Log output goes to stderr so that JSON on stdout stays machine-readable.
//! Records emitted by the library through the `log` facade are forwarded to
//! the same subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Initialize structured logging
///
/// Features:
/// - Configurable log levels via RUST_LOG env var
/// - Target and source location on every record
/// - Library `log` records bridged into `tracing`
///
/// # Example
///
/// ```no_run
/// logging::init();
/// tracing::info!("Bracket draw starting");
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Structured logging initialized");
}

/// Log the outcome of a finished command
pub fn log_command_summary(command: &str, participants: usize, matches: usize) {
    tracing::info!(
        command = command,
        participants = participants,
        matches = matches,
        "Command completed"
    );
}
