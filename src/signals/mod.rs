//! Gap classification and state-transition detection.

pub mod classifier;
pub mod transition;

pub use classifier::{classify, parse_gap_percent, GapThresholds};
pub use transition::{cue_for_transition, Cue, TransitionDetector};
