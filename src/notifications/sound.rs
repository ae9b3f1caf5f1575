//! Audible cues per notification kind.

use crate::error::DeliveryError;
use crate::types::NotificationKind;
use std::f32::consts::PI;
use std::time::Duration;

/// Starting gain of every cue.
const START_GAIN: f32 = 0.3;

/// Gain the exponential decay ends at.
const END_GAIN: f32 = 0.01;

/// A short sine tone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
}

impl Tone {
    /// Fixed tone for each kind: money is high, activity is low.
    pub fn for_kind(kind: NotificationKind) -> Self {
        let (frequency_hz, millis) = match kind {
            NotificationKind::Tip => (800.0, 300),
            NotificationKind::Mint => (600.0, 400),
            NotificationKind::Activity => (400.0, 200),
            NotificationKind::Success | NotificationKind::Error => (500.0, 200),
        };
        Self {
            frequency_hz,
            duration: Duration::from_millis(millis),
        }
    }

    /// Mono PCM samples in [-1, 1], gain decaying from 0.3 to 0.01.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let total = (self.duration.as_secs_f32() * sample_rate as f32).round() as usize;
        if total == 0 {
            return Vec::new();
        }
        let decay = (END_GAIN / START_GAIN).ln();
        let last = (total.max(2) - 1) as f32;

        (0..total)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let gain = START_GAIN * (decay * i as f32 / last).exp();
                gain * (2.0 * PI * self.frequency_hz * t).sin()
            })
            .collect()
    }
}

/// Something that can play a tone.
pub trait SoundSink: Send + Sync {
    fn play(&self, tone: &Tone) -> Result<(), DeliveryError>;
}

/// Sink for hosts without audio.
#[derive(Clone, Copy, Debug, Default)]
pub struct Muted;

impl SoundSink for Muted {
    fn play(&self, _tone: &Tone) -> Result<(), DeliveryError> {
        Err(DeliveryError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_table() {
        assert_eq!(Tone::for_kind(NotificationKind::Tip).frequency_hz, 800.0);
        assert_eq!(
            Tone::for_kind(NotificationKind::Mint).duration,
            Duration::from_millis(400)
        );
        assert_eq!(Tone::for_kind(NotificationKind::Activity).frequency_hz, 400.0);
        assert_eq!(
            Tone::for_kind(NotificationKind::Error),
            Tone::for_kind(NotificationKind::Success)
        );
    }

    #[test]
    fn test_render_length_and_envelope() {
        let tone = Tone::for_kind(NotificationKind::Activity);
        let samples = tone.render(8_000);
        assert_eq!(samples.len(), 1_600);
        assert!(samples.iter().all(|s| s.abs() <= START_GAIN + f32::EPSILON));

        let head_peak = samples[..100].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let tail_peak = samples[1_500..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(head_peak > tail_peak * 5.0);
    }

    #[test]
    fn test_render_zero_duration() {
        let tone = Tone {
            frequency_hz: 440.0,
            duration: Duration::ZERO,
        };
        assert!(tone.render(44_100).is_empty());
    }
}
