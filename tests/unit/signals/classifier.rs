//! Unit tests for gap classification

use gapwatch::signals::{classify, parse_gap_percent};
use gapwatch::MarketState;

fn grid(from: f64, to: f64, step: f64) -> Vec<f64> {
    let mut values = Vec::new();
    let mut g = from;
    while g <= to {
        values.push(g);
        g += step;
    }
    values
}

#[test]
fn below_six_is_appreciation() {
    for g in grid(-50.0, 5.99, 0.01) {
        assert_eq!(classify(g), MarketState::Appreciation, "gap {}", g);
    }
    assert_eq!(classify(6.0), MarketState::Stable);
}

#[test]
fn above_nine_is_devaluation() {
    for g in grid(9.01, 250.0, 0.37) {
        assert_eq!(classify(g), MarketState::Devaluation, "gap {}", g);
    }
    assert_eq!(classify(9.0), MarketState::Stable);
}

#[test]
fn band_is_stable_inclusive() {
    for g in grid(6.0, 9.0, 0.05) {
        assert_eq!(classify(g), MarketState::Stable, "gap {}", g);
    }
    assert_eq!(classify(9.0), MarketState::Stable);
}

#[test]
fn nan_is_stable() {
    assert_eq!(classify(f64::NAN), MarketState::Stable);
}

#[test]
fn parsed_display_values_classify() {
    assert_eq!(classify(parse_gap_percent("9,00%")), MarketState::Stable);
    assert_eq!(classify(parse_gap_percent("9,01%")), MarketState::Devaluation);
    assert_eq!(classify(parse_gap_percent("5,99 %")), MarketState::Appreciation);
    assert_eq!(classify(parse_gap_percent("garbage")), MarketState::Appreciation);
}
