//! Error taxonomy for acquisition, session lifecycle and audio playback.

use thiserror::Error;

use crate::core::session::SessionMode;

/// Failure of a single acquisition cycle.
///
/// Every variant is recoverable: the engine keeps the last good snapshot and
/// waits for the next tick or a manual retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    /// The request did not complete within the acquisition timeout.
    #[error("request timed out")]
    Timeout,

    /// The source answered with a non-success status.
    #[error("source answered with HTTP {0}")]
    HttpStatus(u16),

    /// DNS, connection or cross-origin failure before any response arrived.
    #[error("network or CORS failure: {0}")]
    NetworkOrCors(String),

    /// The request succeeded but the body was not the expected shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl AcquisitionError {
    /// Human-readable category shown by the presentation layer.
    pub fn category(&self) -> String {
        match self {
            AcquisitionError::Timeout => {
                "Timeout: the data source took longer than 8 seconds to answer".to_string()
            }
            AcquisitionError::HttpStatus(code) => format!("HTTP error {}", code),
            AcquisitionError::NetworkOrCors(_) => {
                "Network error: the data source is unreachable or blocked by CORS".to_string()
            }
            AcquisitionError::MalformedPayload(_) => {
                "Invalid data: the response has no gap analysis".to_string()
            }
            AcquisitionError::Unknown(message) => format!("Unexpected error: {}", message),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AcquisitionError::Timeout)
    }
}

impl From<reqwest::Error> for AcquisitionError {
    /// Classify a transport failure by its kind, falling back to the message
    /// only when reqwest does not categorise it.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AcquisitionError::Timeout;
        }
        if let Some(status) = err.status() {
            return AcquisitionError::HttpStatus(status.as_u16());
        }
        if err.is_decode() {
            return AcquisitionError::MalformedPayload(err.to_string());
        }
        if err.is_connect() || err.is_request() || err.is_redirect() {
            return AcquisitionError::NetworkOrCors(err.to_string());
        }

        let message = err.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("timed out") || lowered.contains("timeout") {
            AcquisitionError::Timeout
        } else if lowered.contains("dns")
            || lowered.contains("connection")
            || lowered.contains("cors")
        {
            AcquisitionError::NetworkOrCors(message)
        } else {
            AcquisitionError::Unknown(message)
        }
    }
}

/// Misuse of the session lifecycle by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("session already started in {0:?} mode")]
    SessionAlreadyStarted(SessionMode),

    #[error("session has not been started")]
    NotStarted,

    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("no endpoint configured")]
    MissingEndpoint,

    #[error("engine has been shut down")]
    ShutDown,
}

/// Audio failures. These never leave the tone synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("playback failed: {0}")]
    Playback(String),
}
