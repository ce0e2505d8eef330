//! Fixed demonstration scenarios, cycled in order.

use chrono::Local;

use crate::models::snapshot::{MarketSnapshot, MarketState};
use crate::services::gap_api::OBSERVED_AT_FORMAT;

/// A canned observation and the state it is expected to classify as.
#[derive(Debug, Clone, Copy)]
pub struct DemoScenario {
    pub official_rate: &'static str,
    pub parallel_rate: &'static str,
    pub gap_absolute: &'static str,
    pub gap_percent: &'static str,
    pub expected: MarketState,
}

pub const DEMO_SCENARIOS: [DemoScenario; 3] = [
    DemoScenario {
        official_rate: "36,50",
        parallel_rate: "39,20",
        gap_absolute: "2,70",
        gap_percent: "7,40%",
        expected: MarketState::Stable,
    },
    DemoScenario {
        official_rate: "36,50",
        parallel_rate: "41,80",
        gap_absolute: "5,30",
        gap_percent: "14,52%",
        expected: MarketState::Devaluation,
    },
    DemoScenario {
        official_rate: "36,50",
        parallel_rate: "38,10",
        gap_absolute: "1,60",
        gap_percent: "4,38%",
        expected: MarketState::Appreciation,
    },
];

impl DemoScenario {
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot::new(
            self.official_rate,
            self.parallel_rate,
            self.gap_absolute,
            self.gap_percent,
            Local::now().format(OBSERVED_AT_FORMAT).to_string(),
        )
    }
}

/// Pointer into [`DEMO_SCENARIOS`] that wraps after the last entry.
#[derive(Debug, Default)]
pub struct DemoCycle {
    position: usize,
}

impl DemoCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Emit the current scenario and advance.
    pub fn next_snapshot(&mut self) -> MarketSnapshot {
        let snapshot = DEMO_SCENARIOS[self.position].snapshot();
        self.position = (self.position + 1) % DEMO_SCENARIOS.len();
        snapshot
    }
}
