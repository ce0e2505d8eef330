//! Shared data models spanning the engine layers.

pub mod snapshot;

pub use snapshot::{MarketSnapshot, MarketState};
