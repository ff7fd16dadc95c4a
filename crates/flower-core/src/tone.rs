//! Geometry to loudness and pitch mappings.
//!
//! Pure functions over distances, radii and wave ages; nothing here knows
//! about samplers or synthesis. `DroneTracker` is the one stateful piece: it
//! smooths the ambient drone level from the recent pitch history.

use crate::constants::*;
use rand::Rng;
use smallvec::SmallVec;

/// Remaining fraction of a wave's life, clamped to `[0, 1]`.
#[inline]
pub fn lifetime_ratio(lifetime: i32, initial_lifetime: i32) -> f64 {
    if initial_lifetime <= 0 {
        return 0.0;
    }
    (lifetime as f64 / initial_lifetime as f64).clamp(0.0, 1.0)
}

/// Volume for an intersection-triggered note: glow radius over its maximum.
#[inline]
pub fn intersection_volume(radius: f64, max_radius: f64) -> f64 {
    if max_radius <= 0.0 {
        return 0.0;
    }
    (radius / max_radius).clamp(0.0, 1.0)
}

/// Pop loudness in dB for a normalized volume.
#[inline]
pub fn pop_gain_db(volume: f64) -> f64 {
    POP_MIN_DB + (POP_MAX_DB - POP_MIN_DB) * volume.clamp(0.0, 1.0)
}

/// Final note velocity: hint times the track multiplier, kept in `[0, 1]`.
#[inline]
pub fn velocity(volume_hint: f64, multiplier: f64) -> f64 {
    (volume_hint * multiplier).clamp(0.0, 1.0)
}

/// Random frequency for the splash tone of a new wave.
pub fn splash_frequency<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    SPLASH_MIN_HZ + rng.gen::<f64>() * SPLASH_BAND_HZ
}

/// Random playback rate for a pop.
pub fn pop_playback_rate<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    POP_RATE_MIN + rng.gen::<f64>() * POP_RATE_SPAN
}

/// Linear speed to pitch mapping without the upper cap.
#[inline]
fn speed_to_hz(weighted_speed: f64) -> f64 {
    let scaled = weighted_speed.max(0.0) * DRONE_SPEED_SCALE;
    DRONE_MIN_HZ + scaled * (DRONE_MAX_HZ - DRONE_MIN_HZ)
}

/// Map weighted point speed to a drone pitch in `[200, 800]` Hz.
#[inline]
pub fn drone_frequency(weighted_speed: f64) -> f64 {
    speed_to_hz(weighted_speed).min(DRONE_MAX_HZ)
}

/// Scalar drone output for the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DroneLevel {
    pub weighted_speed: f64,
    pub frequency_hz: f64,
    pub volume_db: f64,
}

/// Keeps the last few drone pitches. A steady pitch (low variance) fades the
/// drone out one dB per tick; movement brings it back up to the ceiling.
#[derive(Clone, Debug)]
pub struct DroneTracker {
    history: SmallVec<[f64; DRONE_HISTORY_LEN]>,
    volume_db: f64,
    last: DroneLevel,
}

impl Default for DroneTracker {
    fn default() -> Self {
        Self {
            history: SmallVec::new(),
            volume_db: DRONE_START_DB,
            last: DroneLevel {
                weighted_speed: 0.0,
                frequency_hz: DRONE_MIN_HZ,
                volume_db: DRONE_START_DB,
            },
        }
    }
}

impl DroneTracker {
    pub fn update(&mut self, weighted_speed: f64) -> DroneLevel {
        // Unclamped mapping feeds the variance so big swings still register
        let raw = speed_to_hz(weighted_speed);
        if self.history.len() == DRONE_HISTORY_LEN {
            self.history.remove(0);
        }
        self.history.push(raw);

        let n = self.history.len() as f64;
        let mean = self.history.iter().sum::<f64>() / n;
        let variance = self.history.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n;
        self.volume_db = if variance < DRONE_VARIANCE_THRESHOLD {
            (self.volume_db - DRONE_STEP_DB).max(DRONE_FLOOR_DB)
        } else {
            (self.volume_db + DRONE_STEP_DB).min(DRONE_CEILING_DB)
        };

        self.last = DroneLevel {
            weighted_speed,
            frequency_hz: drone_frequency(weighted_speed),
            volume_db: self.volume_db,
        };
        self.last
    }

    pub fn level(&self) -> DroneLevel {
        self.last
    }
}
