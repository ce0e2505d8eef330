use serde::{Deserialize, Serialize};

use crate::signals::classifier::{classify, parse_gap_percent};

/// Discrete market regime derived from the gap percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketState {
    Stable,
    Devaluation,
    Appreciation,
}

impl MarketState {
    pub fn label(&self) -> &'static str {
        match self {
            MarketState::Stable => "Stable",
            MarketState::Devaluation => "Devaluation",
            MarketState::Appreciation => "Appreciation",
        }
    }
}

impl std::fmt::Display for MarketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One immutable observation of the official/parallel spread.
///
/// Rates and the absolute gap are opaque display strings; only `gap_percent`
/// is ever parsed, and `state` is always derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub official_rate: String,
    pub parallel_rate: String,
    pub gap_absolute: String,
    pub gap_percent: String,
    pub observed_at: String,
    pub state: MarketState,
}

impl MarketSnapshot {
    pub fn new(
        official_rate: impl Into<String>,
        parallel_rate: impl Into<String>,
        gap_absolute: impl Into<String>,
        gap_percent: impl Into<String>,
        observed_at: impl Into<String>,
    ) -> Self {
        let gap_percent = gap_percent.into();
        let state = classify(parse_gap_percent(&gap_percent));
        Self {
            official_rate: official_rate.into(),
            parallel_rate: parallel_rate.into(),
            gap_absolute: gap_absolute.into(),
            gap_percent,
            observed_at: observed_at.into(),
            state,
        }
    }

    /// Numeric gap as the classifier saw it.
    pub fn gap_value(&self) -> f64 {
        parse_gap_percent(&self.gap_percent)
    }
}
