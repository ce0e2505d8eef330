//! Transition detection: decides when a state change deserves a cue.

use tracing::{debug, info};

pub use crate::audio::voice::Cue;
use crate::models::snapshot::{MarketSnapshot, MarketState};

/// Total mapping from (previous, next) state to an optional cue.
///
/// `None` as previous means no state has been observed yet, which always
/// counts as a change.
pub fn cue_for_transition(previous: Option<MarketState>, next: MarketState) -> Option<Cue> {
    if previous == Some(next) {
        return None;
    }

    match next {
        MarketState::Devaluation => Some(Cue::Ascend),
        MarketState::Appreciation => Some(Cue::Descend),
        MarketState::Stable => None,
    }
}

/// Holds the last observed state. The only writer of that state.
#[derive(Debug, Default)]
pub struct TransitionDetector {
    last_state: Option<MarketState>,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_state(&self) -> Option<MarketState> {
        self.last_state
    }

    pub fn on_snapshot(&mut self, snapshot: &MarketSnapshot) -> Option<Cue> {
        self.observe(snapshot.state)
    }

    /// Decide on a cue for `next`, then record it as the last state.
    pub fn observe(&mut self, next: MarketState) -> Option<Cue> {
        let previous = self.last_state;
        let cue = cue_for_transition(previous, next);

        if previous != Some(next) {
            info!(
                previous = ?previous,
                next = %next,
                cue = ?cue,
                "TransitionDetector: market state changed"
            );
        } else {
            debug!(state = %next, "TransitionDetector: state unchanged");
        }

        self.last_state = Some(next);
        cue
    }
}
