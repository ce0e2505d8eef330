//! Unit tests for cue rendering

use gapwatch::audio::{render, Cue, CueProgram};

const RATE: u32 = 8_000;

fn energy(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s * s).sum()
}

#[test]
fn descend_voices_enter_staggered() {
    let program = Cue::Descend.program();
    let full = render(&program, RATE);
    let solo = render(
        &CueProgram {
            voices: vec![program.voices[0].clone()],
        },
        RATE,
    );

    // Only the first voice sounds during the first 80 ms.
    let second_entry = 80 * RATE as usize / 1000;
    assert_eq!(full[..second_entry], solo[..second_entry]);
    assert_ne!(full[second_entry..second_entry + 40], solo[second_entry..second_entry + 40]);
    assert!(energy(&full[..second_entry]) > 0.0);
}

#[test]
fn ascend_fades_to_silence() {
    let samples = render(&Cue::Ascend.program(), RATE);
    let tail = &samples[samples.len() - 8..];
    assert!(tail.iter().all(|s| s.abs() < 0.01));
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    assert!(peak <= 0.1201);
}

#[test]
fn cues_are_deterministic() {
    for cue in [Cue::Ascend, Cue::Descend, Cue::Welcome] {
        assert_eq!(render(&cue.program(), RATE), render(&cue.program(), RATE));
    }
}
