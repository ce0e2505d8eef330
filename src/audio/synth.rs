//! Tone synthesizer: renders cue programs and sends them to a backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::audio::backend::AudioBackend;
use crate::audio::voice::{Cue, CueProgram};
use crate::error::AudioError;

/// Render a program to mono PCM at `sample_rate`.
pub fn render(program: &CueProgram, sample_rate: u32) -> Vec<f32> {
    let rate = sample_rate as f64;
    let total = (program.duration() * rate).ceil() as usize;
    let mut buffer = vec![0.0f64; total];

    for voice in &program.voices {
        let first = (voice.start * rate).round() as usize;
        let last = ((voice.end() * rate).ceil() as usize).min(total);
        let mut phase = 0.0;

        for (offset, slot) in buffer[first.min(last)..last].iter_mut().enumerate() {
            let t = offset as f64 / rate;
            let frequency = voice.frequency.value_at(t);
            let gain = voice.gain.value_at(t);
            *slot += voice.waveform.sample(phase) * gain;
            phase += frequency / rate;
        }
    }

    buffer
        .into_iter()
        .map(|s| s.clamp(-1.0, 1.0) as f32)
        .collect()
}

/// Plays cues through an [`AudioBackend`], gated by a shared enable flag.
#[derive(Clone)]
pub struct ToneSynthesizer {
    backend: Arc<dyn AudioBackend>,
    enabled: Arc<AtomicBool>,
}

impl ToneSynthesizer {
    /// Audio starts disabled until the user opts in.
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            enabled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Play a cue. Returns silently when audio is disabled; device failures
    /// are logged and never reach the caller.
    pub async fn play(&self, cue: Cue) {
        if !self.is_enabled() {
            debug!(cue = ?cue, "ToneSynthesizer: audio disabled, skipping cue");
            return;
        }

        let backend = self.backend.clone();
        let outcome = tokio::task::spawn_blocking(move || play_blocking(backend.as_ref(), cue)).await;

        match outcome {
            Ok(Ok(())) => debug!(cue = ?cue, "ToneSynthesizer: cue played"),
            Ok(Err(e)) => warn!(cue = ?cue, error = %e, "ToneSynthesizer: cue failed"),
            Err(e) => warn!(cue = ?cue, error = %e, "ToneSynthesizer: playback task failed"),
        }
    }
}

fn play_blocking(backend: &dyn AudioBackend, cue: Cue) -> Result<(), AudioError> {
    let mut device = backend.open(cue)?;
    let samples = render(&cue.program(), backend.sample_rate());
    let written = device.write(&samples);
    let closed = device.close();
    written.and(closed)
}
