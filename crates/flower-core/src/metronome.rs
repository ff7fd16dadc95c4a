use std::time::Duration;

/// Quarter-note beat clock for hosts without their own musical transport.
///
/// Accumulates frame time and reports how many beat boundaries were crossed,
/// so a long frame never drops beats.
#[derive(Clone, Debug)]
pub struct Metronome {
    bpm: f64,
    beat_accum: f64,
}

impl Metronome {
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm,
            beat_accum: 0.0,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm;
    }

    #[inline]
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Advance by `dt`, returning the number of beats crossed.
    pub fn tick(&mut self, dt: Duration) -> u32 {
        let seconds_per_beat = self.seconds_per_beat();
        self.beat_accum += dt.as_secs_f64();
        let mut beats = 0;
        while self.beat_accum >= seconds_per_beat {
            self.beat_accum -= seconds_per_beat;
            beats += 1;
        }
        beats
    }

    pub fn reset(&mut self) {
        self.beat_accum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_beats_at_240_bpm() {
        let mut m = Metronome::new(240.0);
        assert_eq!(m.tick(Duration::from_millis(200)), 0);
        assert_eq!(m.tick(Duration::from_millis(100)), 1);
        assert_eq!(m.tick(Duration::from_secs(1)), 4);
    }
}
