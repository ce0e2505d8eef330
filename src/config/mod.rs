//! Engine timing constants and environment helpers.
//!
//! The engine itself reads no environment variables; the helpers below are
//! for the binary that hosts it.

use std::env;

use tokio::time::Duration;

/// Hard deadline for one acquisition.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(8_000);
/// Live polling period.
pub const POLL_INTERVAL: Duration = Duration::from_millis(30_000);
/// Demo scenario period.
pub const DEMO_INTERVAL: Duration = Duration::from_millis(6_000);

/// Timing used by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub demo_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout: REQUEST_TIMEOUT,
            poll_interval: POLL_INTERVAL,
            demo_interval: DEMO_INTERVAL,
        }
    }
}

impl EngineConfig {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_demo_interval(mut self, interval: Duration) -> Self {
        self.demo_interval = interval;
        self
    }
}

/// Deployment environment name, `sandbox` unless `APP_ENV` says otherwise.
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .map(|v| v.trim().to_lowercase())
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "sandbox".to_string())
}

/// Endpoint the binary pre-fills before the session starts.
pub fn get_endpoint() -> Option<String> {
    env::var("GAP_ENDPOINT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Whether the binary should start in demo mode.
pub fn demo_requested() -> bool {
    env::var("GAP_DEMO")
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Whether the binary should ring terminal bells for cues. `GAP_AUDIO=off`
/// (or `0`, `none`, `false`) runs headless.
pub fn audio_output_enabled() -> bool {
    env::var("GAP_AUDIO")
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "off" | "0" | "none" | "false"))
        .unwrap_or(true)
}
