//! Parametric cue programs
//!
//! A cue is described the way an oscillator graph would be wired: each voice
//! has a waveform, a start offset, and automation curves for frequency and
//! gain. Nothing here touches a device.

use serde::{Deserialize, Serialize};

/// Audio cue emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Devaluation alert.
    Ascend,
    /// Appreciation alert.
    Descend,
    /// Played once when the user starts a session.
    Welcome,
}

impl Cue {
    pub fn program(&self) -> CueProgram {
        match self {
            Cue::Ascend => ascend_program(),
            Cue::Descend => descend_program(),
            Cue::Welcome => welcome_program(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

impl Waveform {
    /// Sample the waveform at `phase` in cycles.
    pub fn sample(&self, phase: f64) -> f64 {
        let frac = phase - phase.floor();
        match self {
            Waveform::Sine => (frac * std::f64::consts::TAU).sin(),
            Waveform::Sawtooth => 2.0 * frac - 1.0,
        }
    }
}

/// How the curve reaches a point from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Set,
    Linear,
    Exponential,
}

/// Automation point; `at` is in seconds relative to the voice start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub at: f64,
    pub value: f64,
    pub ramp: Ramp,
}

impl Point {
    pub fn set(at: f64, value: f64) -> Self {
        Self { at, value, ramp: Ramp::Set }
    }

    pub fn linear(at: f64, value: f64) -> Self {
        Self { at, value, ramp: Ramp::Linear }
    }

    pub fn exponential(at: f64, value: f64) -> Self {
        Self { at, value, ramp: Ramp::Exponential }
    }
}

/// Piecewise automation curve, points sorted by time.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub points: Vec<Point>,
}

impl Envelope {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn peak(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    /// Curve value at `t` seconds. Holds the first value before the first
    /// point and the last value after the last one.
    pub fn value_at(&self, t: f64) -> f64 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        if t <= first.at {
            return first.value;
        }

        for pair in self.points.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if t > to.at {
                continue;
            }
            let span = to.at - from.at;
            if span <= 0.0 {
                return to.value;
            }
            let progress = (t - from.at) / span;
            return match to.ramp {
                Ramp::Set => from.value,
                Ramp::Linear => from.value + (to.value - from.value) * progress,
                Ramp::Exponential if from.value > 0.0 && to.value > 0.0 => {
                    from.value * (to.value / from.value).powf(progress)
                }
                Ramp::Exponential => from.value + (to.value - from.value) * progress,
            };
        }

        self.points.last().map(|p| p.value).unwrap_or(0.0)
    }
}

/// A single oscillator with its envelopes.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    /// Offset from the start of the cue, in seconds.
    pub start: f64,
    /// Duration after `start` at which the oscillator stops.
    pub stop: f64,
    pub frequency: Envelope,
    pub gain: Envelope,
}

impl Voice {
    pub fn end(&self) -> f64 {
        self.start + self.stop
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CueProgram {
    pub voices: Vec<Voice>,
}

impl CueProgram {
    /// Total length in seconds.
    pub fn duration(&self) -> f64 {
        self.voices.iter().map(Voice::end).fold(0.0, f64::max)
    }
}

fn ascend_program() -> CueProgram {
    CueProgram {
        voices: vec![Voice {
            waveform: Waveform::Sawtooth,
            start: 0.0,
            stop: 0.4,
            frequency: Envelope::new(vec![
                Point::set(0.0, 440.0),
                Point::linear(0.15, 880.0),
                Point::linear(0.3, 440.0),
            ]),
            gain: Envelope::new(vec![
                Point::set(0.0, 0.0),
                Point::linear(0.05, 0.12),
                Point::linear(0.4, 0.0),
            ]),
        }],
    }
}

const DESCEND_NOTES: [f64; 3] = [523.25, 783.99, 1046.50];
const DESCEND_SPACING: f64 = 0.08;

fn descend_program() -> CueProgram {
    let voices = DESCEND_NOTES
        .iter()
        .enumerate()
        .map(|(i, &freq)| Voice {
            waveform: Waveform::Sine,
            start: i as f64 * DESCEND_SPACING,
            stop: 0.5,
            frequency: Envelope::new(vec![Point::set(0.0, freq)]),
            gain: Envelope::new(vec![
                Point::set(0.0, 0.0),
                Point::linear(0.02, 0.1),
                Point::exponential(0.5, 0.001),
            ]),
        })
        .collect();
    CueProgram { voices }
}

fn welcome_program() -> CueProgram {
    CueProgram {
        voices: vec![Voice {
            waveform: Waveform::Sine,
            start: 0.0,
            stop: 0.5,
            frequency: Envelope::new(vec![
                Point::set(0.0, 880.0),
                Point::exponential(0.5, 440.0),
            ]),
            gain: Envelope::new(vec![
                Point::set(0.0, 0.0),
                Point::linear(0.05, 0.05),
                Point::linear(0.5, 0.0),
            ]),
        }],
    }
}
