#[cfg(feature = "playback")]
use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;

/// Synthesized countdown cue: one short beep per second, a long beep on the last second.
pub struct CountdownBeep {
    seconds: u32,
    frequency: f32,
    num_sample: u64,
    total_samples: u64,
}

impl CountdownBeep {
    pub fn new(seconds: u32) -> Self {
        Self {
            seconds,
            frequency: 880.0,
            num_sample: 0,
            total_samples: u64::from(seconds) * u64::from(SAMPLE_RATE),
        }
    }

    /// Known synthesized cues; anything else is treated as a file path by the engine.
    pub fn for_id(cue_id: &str) -> Option<Self> {
        match cue_id {
            "countdown" => Some(Self::new(10)),
            "short" => Some(Self::new(3)),
            _ => None,
        }
    }

    fn envelope(&self, t_in_second: f32, second: u64) -> f32 {
        let beep_len = if second + 1 == u64::from(self.seconds) {
            0.6
        } else {
            0.12
        };
        if t_in_second < beep_len {
            1.0
        } else {
            0.0
        }
    }
}

impl Iterator for CountdownBeep {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }

        let second = self.num_sample / u64::from(SAMPLE_RATE);
        let t_in_second =
            (self.num_sample % u64::from(SAMPLE_RATE)) as f32 / SAMPLE_RATE as f32;
        let frequency = if second + 1 == u64::from(self.seconds) {
            self.frequency * 2.0
        } else {
            self.frequency
        };
        self.num_sample += 1;

        let sample = (2.0 * PI * frequency * t_in_second).sin();
        Some(sample * self.envelope(t_in_second, second) * 0.25)
    }
}

impl CountdownBeep {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.seconds))
    }
}

#[cfg(feature = "playback")]
impl Source for CountdownBeep {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.duration())
    }
}
