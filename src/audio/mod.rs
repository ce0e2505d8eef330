//! Synthesized audio cues.

pub mod backend;
pub mod synth;
pub mod voice;

pub use backend::{
    bell_count, AudioBackend, AudioDevice, BellBackend, FailingBackend, NullBackend,
    RecordingBackend,
};
pub use synth::{render, ToneSynthesizer};
pub use voice::{Cue, CueProgram, Envelope, Point, Ramp, Voice, Waveform};
