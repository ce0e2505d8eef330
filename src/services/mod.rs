//! Snapshot sources: the live HTTP endpoint and the demo scenario loop.

pub mod demo;
pub mod gap_api;
pub mod market_data;

pub use demo::{DemoCycle, DEMO_SCENARIOS};
pub use gap_api::{GapAnalysis, GapApiClient, GapPayload};
pub use market_data::SnapshotSource;
