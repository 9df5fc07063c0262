//! Alert tones using Kira.
//!
//! The console ships no sound assets; every cue is a short synthesized
//! tone. Cues are fire-and-forget: the reactor fires one per status
//! transition and playback failures only log.

use anyhow::Result;
use console_core::AlertKind;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
    Frame,
};

const SAMPLE_RATE: u32 = 44_100;

/// Tone waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// Audio cues played by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Status entered WARNING: 600 Hz sine.
    Warning,
    /// Status entered SAFETY_OVERRIDE: 800 Hz square.
    Critical,
    /// Commander override / RTB: 400 Hz sawtooth.
    Override,
    /// Action acknowledged (anchor logged): 1200 Hz sine.
    Confirm,
}

impl From<AlertKind> for Cue {
    fn from(kind: AlertKind) -> Self {
        match kind {
            AlertKind::Warning => Cue::Warning,
            AlertKind::Critical => Cue::Critical,
            AlertKind::Override => Cue::Override,
        }
    }
}

impl Cue {
    fn params(self) -> (f32, Waveform, f32) {
        match self {
            Cue::Warning => (600.0, Waveform::Sine, 0.15),
            Cue::Critical => (800.0, Waveform::Square, 0.2),
            Cue::Override => (400.0, Waveform::Sawtooth, 0.3),
            Cue::Confirm => (1200.0, Waveform::Sine, 0.1),
        }
    }
}

/// Duration of every cue in seconds.
const CUE_SECONDS: f32 = 0.15;

/// Synthesize one cue as a mono buffer with a short fade-out so the tone
/// ends without a click.
fn synthesize(cue: Cue) -> Vec<Frame> {
    let (freq, waveform, gain) = cue.params();
    let total = (SAMPLE_RATE as f32 * CUE_SECONDS) as usize;
    let fade = total / 8;
    let mut frames = Vec::with_capacity(total);
    for i in 0..total {
        let t = i as f32 / SAMPLE_RATE as f32;
        let phase = (t * freq).fract();
        let raw = match waveform {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        };
        let env = if i + fade >= total {
            (total - i) as f32 / fade as f32
        } else if i < fade {
            i as f32 / fade as f32
        } else {
            1.0
        };
        frames.push(Frame::from_mono(raw * gain * env));
    }
    frames
}

/// Audio system for the console. Construction fails when no output
/// device is available; the console treats that as a degraded mode and
/// carries on silently.
pub struct AudioSystem {
    manager: AudioManager,
    active: Vec<StaticSoundHandle>,
}

impl AudioSystem {
    pub fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        Ok(Self {
            manager,
            active: Vec::new(),
        })
    }

    /// Play a cue, fire-and-forget.
    pub fn play(&mut self, cue: Cue) {
        let data = StaticSoundData {
            sample_rate: SAMPLE_RATE,
            frames: synthesize(cue).into(),
            settings: StaticSoundSettings::default(),
            slice: None,
        };
        match self.manager.play(data) {
            Ok(handle) => self.active.push(handle),
            Err(e) => log::warn!("Could not play {:?} cue: {}", cue, e),
        }
    }

    /// Drop handles for finished sounds. Call once per frame.
    pub fn cleanup(&mut self) {
        self.active
            .retain(|h| h.state() != kira::sound::PlaybackState::Stopped);
    }

    /// Stop everything (teardown).
    pub fn stop_all(&mut self) {
        for handle in &mut self.active {
            let _ = handle.stop(Tween::default());
        }
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tones_are_normalized_and_faded() {
        for cue in [Cue::Warning, Cue::Critical, Cue::Override, Cue::Confirm] {
            let frames = synthesize(cue);
            assert_eq!(frames.len(), (SAMPLE_RATE as f32 * CUE_SECONDS) as usize);
            assert!(frames.iter().all(|f| f.left.abs() <= 1.0));
            // Fade-out means the final sample is near silent.
            assert!(frames.last().unwrap().left.abs() < 0.01);
        }
    }

    #[test]
    fn alert_kinds_map_to_cues() {
        assert_eq!(Cue::from(AlertKind::Warning), Cue::Warning);
        assert_eq!(Cue::from(AlertKind::Critical), Cue::Critical);
        assert_eq!(Cue::from(AlertKind::Override), Cue::Override);
    }
}
