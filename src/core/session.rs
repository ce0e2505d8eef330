//! Session lifecycle: Idle until the user consents, then Live or Demo for good.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Idle,
    Live,
    Demo,
}

/// Mode and endpoint of the running dashboard.
///
/// The last observed market state is not kept here; it belongs to the
/// transition detector.
#[derive(Debug, Clone)]
pub struct EngineSession {
    mode: SessionMode,
    endpoint: Option<String>,
}

impl Default for EngineSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineSession {
    pub fn new() -> Self {
        Self {
            mode: SessionMode::Idle,
            endpoint: None,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        self.mode == SessionMode::Idle
    }

    /// Replace the endpoint. Only allowed while idle; an invalid address
    /// leaves the previous one in place.
    pub fn set_endpoint(&mut self, raw: &str) -> Result<(), EngineError> {
        if !self.is_idle() {
            return Err(EngineError::SessionAlreadyStarted(self.mode));
        }
        self.endpoint = Some(validate_endpoint(raw)?);
        Ok(())
    }

    /// Leave Idle. Live requires an endpoint to have been configured.
    pub fn begin(&mut self, mode: SessionMode) -> Result<(), EngineError> {
        if !self.is_idle() {
            return Err(EngineError::SessionAlreadyStarted(self.mode));
        }
        match mode {
            SessionMode::Idle => return Err(EngineError::NotStarted),
            SessionMode::Live if self.endpoint.is_none() => {
                return Err(EngineError::MissingEndpoint);
            }
            _ => {}
        }
        self.mode = mode;
        Ok(())
    }
}

/// Accept absolute http(s) URLs only. The address is kept as typed, minus
/// surrounding whitespace.
pub fn validate_endpoint(raw: &str) -> Result<String, EngineError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| EngineError::InvalidEndpoint(trimmed.to_string()))?;

    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(trimmed.to_string()),
        _ => Err(EngineError::InvalidEndpoint(trimmed.to_string())),
    }
}
