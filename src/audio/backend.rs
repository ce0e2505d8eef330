//! Audio output backends
//!
//! A backend hands out one device per cue; the synthesizer closes it when the
//! cue is done, so nothing stays open between cues.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::audio::voice::Cue;
use crate::error::AudioError;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

pub trait AudioBackend: Send + Sync {
    fn sample_rate(&self) -> u32;

    /// Acquire a device for a single cue.
    fn open(&self, cue: Cue) -> Result<Box<dyn AudioDevice>, AudioError>;
}

pub trait AudioDevice: Send {
    fn write(&mut self, samples: &[f32]) -> Result<(), AudioError>;

    fn close(self: Box<Self>) -> Result<(), AudioError>;
}

/// Renders and discards. Used when no output device is wired in.
#[derive(Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }

    fn open(&self, cue: Cue) -> Result<Box<dyn AudioDevice>, AudioError> {
        Ok(Box::new(NullDevice { cue, frames: 0 }))
    }
}

struct NullDevice {
    cue: Cue,
    frames: usize,
}

impl AudioDevice for NullDevice {
    fn write(&mut self, samples: &[f32]) -> Result<(), AudioError> {
        self.frames += samples.len();
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), AudioError> {
        debug!(cue = ?self.cue, frames = self.frames, "NullBackend: cue discarded");
        Ok(())
    }
}

/// Delay between two bells of the same cue.
pub const BELL_SPACING: Duration = Duration::from_millis(200);

const BEL: &[u8] = b"\x07";

/// Number of terminal bells standing in for a cue: one for the welcome
/// chime, two for a rising gap, three for the falling arpeggio.
pub fn bell_count(cue: Cue) -> usize {
    match cue {
        Cue::Welcome => 1,
        Cue::Ascend => 2,
        Cue::Descend => 3,
    }
}

/// Plays cues as terminal bells (BEL) on a writer, stdout by default.
///
/// The rendered PCM is not audible through a terminal, so each cue maps to a
/// bell pattern instead. Devices block while the pattern plays; the
/// synthesizer runs them off the async workers.
#[derive(Clone)]
pub struct BellBackend {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
    spacing: Duration,
}

impl BellBackend {
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
            spacing: BELL_SPACING,
        }
    }

    pub fn with_spacing(mut self, spacing: Duration) -> Self {
        self.spacing = spacing;
        self
    }
}

impl Default for BellBackend {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for BellBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BellBackend")
            .field("spacing", &self.spacing)
            .finish_non_exhaustive()
    }
}

impl AudioBackend for BellBackend {
    fn sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }

    fn open(&self, cue: Cue) -> Result<Box<dyn AudioDevice>, AudioError> {
        Ok(Box::new(BellDevice {
            cue,
            frames: 0,
            sink: self.sink.clone(),
            spacing: self.spacing,
        }))
    }
}

struct BellDevice {
    cue: Cue,
    frames: usize,
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
    spacing: Duration,
}

impl AudioDevice for BellDevice {
    fn write(&mut self, samples: &[f32]) -> Result<(), AudioError> {
        self.frames += samples.len();
        Ok(())
    }

    /// Ring the pattern. Nothing sounds for a cue that rendered no samples.
    fn close(self: Box<Self>) -> Result<(), AudioError> {
        if self.frames == 0 {
            return Ok(());
        }
        let count = bell_count(self.cue);
        for i in 0..count {
            if i > 0 {
                std::thread::sleep(self.spacing);
            }
            let mut sink = self
                .sink
                .lock()
                .map_err(|e| AudioError::Playback(e.to_string()))?;
            sink.write_all(BEL)
                .and_then(|_| sink.flush())
                .map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        debug!(cue = ?self.cue, bells = count, "BellBackend: cue played");
        Ok(())
    }
}

/// Captured output of one cue.
#[derive(Debug, Clone)]
pub struct RecordedCue {
    pub cue: Cue,
    pub samples: Vec<f32>,
}

/// Keeps every rendered cue in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    recorded: Arc<Mutex<Vec<RecordedCue>>>,
    open_devices: Arc<AtomicUsize>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recordings(&self) -> Vec<RecordedCue> {
        self.recorded
            .lock()
            .map(|recorded| recorded.clone())
            .unwrap_or_default()
    }

    /// Cues in the order they finished playing.
    pub fn played(&self) -> Vec<Cue> {
        self.recordings().into_iter().map(|r| r.cue).collect()
    }

    /// Devices opened but not yet closed.
    pub fn open_devices(&self) -> usize {
        self.open_devices.load(Ordering::SeqCst)
    }
}

impl AudioBackend for RecordingBackend {
    fn sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }

    fn open(&self, cue: Cue) -> Result<Box<dyn AudioDevice>, AudioError> {
        self.open_devices.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingDevice {
            cue,
            samples: Vec::new(),
            sink: self.recorded.clone(),
            open_devices: self.open_devices.clone(),
        }))
    }
}

struct RecordingDevice {
    cue: Cue,
    samples: Vec<f32>,
    sink: Arc<Mutex<Vec<RecordedCue>>>,
    open_devices: Arc<AtomicUsize>,
}

impl AudioDevice for RecordingDevice {
    fn write(&mut self, samples: &[f32]) -> Result<(), AudioError> {
        self.samples.extend_from_slice(samples);
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), AudioError> {
        let RecordingDevice {
            cue,
            samples,
            sink,
            open_devices,
        } = *self;
        open_devices.fetch_sub(1, Ordering::SeqCst);
        sink.lock()
            .map_err(|e| AudioError::Playback(e.to_string()))?
            .push(RecordedCue { cue, samples });
        Ok(())
    }
}

/// Always reports the device as unavailable.
#[derive(Debug, Default)]
pub struct FailingBackend;

impl AudioBackend for FailingBackend {
    fn sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }

    fn open(&self, _cue: Cue) -> Result<Box<dyn AudioDevice>, AudioError> {
        Err(AudioError::DeviceUnavailable("no output device".to_string()))
    }
}
