//! Gap percentage classification

use crate::models::snapshot::MarketState;

/// Fixed classification band. Both boundaries belong to the stable band.
pub struct GapThresholds;

impl GapThresholds {
    pub const DEVALUATION_ABOVE: f64 = 9.0;
    pub const APPRECIATION_BELOW: f64 = 6.0;
}

/// Map a gap percentage to a market state.
///
/// Total over `f64`: NaN and infinities fall back to `Stable`.
pub fn classify(gap_percent: f64) -> MarketState {
    if !gap_percent.is_finite() {
        return MarketState::Stable;
    }

    if gap_percent > GapThresholds::DEVALUATION_ABOVE {
        MarketState::Devaluation
    } else if gap_percent < GapThresholds::APPRECIATION_BELOW {
        MarketState::Appreciation
    } else {
        MarketState::Stable
    }
}

/// Parse a display percentage such as `"12,5%"`.
///
/// Strips a trailing percent sign and accepts a comma decimal separator.
/// Anything unparseable yields `0.0` rather than an error.
pub fn parse_gap_percent(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    trimmed.replace(',', ".").parse::<f64>().unwrap_or(0.0)
}
