//! Logging initialization with environment-based formatters
//!
//! - Production: Structured JSON logs for log shipping
//! - Sandbox: Colorful, human-readable logs while watching the dashboard
//!
//! Logs always go to stderr; stdout belongs to the dashboard itself.

use std::io::IsTerminal;

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Whether an `APP_ENV` value selects the production formatter.
pub fn is_production(env: &str) -> bool {
    matches!(env, "production" | "prod")
}

/// Initialize logging based on the environment
///
/// - Production: JSON structured logs with source locations
/// - Sandbox/Development: ANSI colors, only when stderr is a terminal
///
/// Calling this twice is harmless; the second subscriber is dropped.
pub fn init_logging() {
    let env = get_environment();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = if is_production(&env) {
        // Production: Structured JSON logs
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        // Sandbox/Development: colors unless stderr is redirected
        let ansi = std::io::stderr().is_terminal();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "logging already initialized");
    }
}
