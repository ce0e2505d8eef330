//! Unit tests for the demo scenario loop

use gapwatch::services::DemoCycle;
use gapwatch::signals::{Cue, TransitionDetector};
use gapwatch::MarketState;

#[test]
fn demo_order_and_cues_are_deterministic() {
    let mut cycle = DemoCycle::new();
    let mut detector = TransitionDetector::new();

    let observed: Vec<(MarketState, Option<Cue>)> = (0..7)
        .map(|_| {
            let snapshot = cycle.next_snapshot();
            let cue = detector.on_snapshot(&snapshot);
            (snapshot.state, cue)
        })
        .collect();

    assert_eq!(
        observed,
        vec![
            (MarketState::Stable, None),
            (MarketState::Devaluation, Some(Cue::Ascend)),
            (MarketState::Appreciation, Some(Cue::Descend)),
            (MarketState::Stable, None),
            (MarketState::Devaluation, Some(Cue::Ascend)),
            (MarketState::Appreciation, Some(Cue::Descend)),
            (MarketState::Stable, None),
        ]
    );
}

#[test]
fn demo_snapshots_carry_display_values() {
    let mut cycle = DemoCycle::new();
    let snapshot = cycle.next_snapshot();
    assert!(snapshot.gap_percent.ends_with('%'));
    assert!(!snapshot.official_rate.is_empty());
    assert!(!snapshot.observed_at.is_empty());
}
