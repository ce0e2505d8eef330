//! Market state engine for an exchange-rate gap dashboard.
//!
//! Acquires gap data (live over HTTP or from a demo loop), classifies it
//! into a [`MarketState`], and plays an audio cue when the state changes.

pub mod audio;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod signals;

pub use crate::core::{DashboardView, EngineSession, MarketEngine, SessionMode};
pub use error::{AcquisitionError, AudioError, EngineError};
pub use models::{MarketSnapshot, MarketState};
