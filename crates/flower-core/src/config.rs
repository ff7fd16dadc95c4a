//! Static configuration consumed once at simulation setup.
//!
//! Every value has a default taken from `constants.rs`. `validate` rejects
//! out-of-range values up front so nothing in the per-tick path has to
//! handle them.

use crate::constants::*;
use crate::music::{parse_chords, HOVER_CHORDS, INTERSECTION_CHORDS, RANDOM_CHORDS};
use glam::DVec2;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("point count must be > 0")]
    ZeroPointCount,
    #[error("{name} must be finite and > 0 (got {value})")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must lie in {range} (got {value})")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
    #[error("wave lifetime must be > 0 ticks (got {0})")]
    ZeroLifetime(i32),
    #[error("chord table is empty")]
    EmptyChordTable,
    #[error("chord table contains an empty chord")]
    EmptyChord,
    #[error("invalid note name {0:?}")]
    InvalidNote(String),
    #[error("playing points ({playing}) exceeds point count ({count})")]
    TooManyPlayingPoints { playing: usize, count: usize },
}

/// Angle between consecutive points of the spiral.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AngleMode {
    /// Fixed golden angle `π(3 − √5)`.
    Golden,
    /// Custom angle drifting by `angle_drift_per_tick`. `None` seeds the
    /// start angle once from the simulation RNG.
    Drift { initial: Option<f64> },
}

/// Radial growth of the spiral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadialMode {
    /// `scale * sqrt(i)`: evenly spread area.
    AreaUniform,
    /// `0.07 * scale * i`: arms spread linearly.
    Linear,
}

#[derive(Clone, Debug)]
pub struct LayoutConfig {
    pub point_count: usize,
    pub center: DVec2,
    pub angle_mode: AngleMode,
    pub radial_mode: RadialMode,
    pub spacing_scale: f64,
    pub angle_drift_per_tick: f64,
    pub breathing_base: f64,
    pub breathing_amplitude: f64,
    pub breathing_speed: f64,
    pub base_radius: f64,
    pub triggered_radius: f64,
    pub radius_decay: f64,
    pub radius_snap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            point_count: DEFAULT_POINT_COUNT,
            center: DVec2::ZERO,
            angle_mode: AngleMode::Drift { initial: None },
            radial_mode: RadialMode::Linear,
            spacing_scale: INITIAL_SPACING_SCALE,
            angle_drift_per_tick: ANGLE_DRIFT_PER_TICK,
            breathing_base: BREATHING_BASE,
            breathing_amplitude: BREATHING_AMPLITUDE,
            breathing_speed: BREATHING_SPEED,
            base_radius: BASE_POINT_RADIUS,
            triggered_radius: TRIGGERED_POINT_RADIUS,
            radius_decay: RADIUS_DECAY,
            radius_snap: RADIUS_SNAP,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    pub spring_strength: f64,
    pub repulsion_decay: f64,
    pub attraction_radius: f64,
    pub attraction_strength: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            spring_strength: SPRING_STRENGTH,
            repulsion_decay: REPULSION_DECAY,
            attraction_radius: ATTRACTION_RADIUS,
            attraction_strength: ATTRACTION_STRENGTH,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WaveConfig {
    pub initial_radius: f64,
    pub growth_rate: f64,
    pub lifetime: i32,
    pub opacity: f64,
    pub force_scale: f64,
    pub max_force: f64,
    pub min_distance_factor: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            initial_radius: WAVE_INITIAL_RADIUS,
            growth_rate: WAVE_GROWTH_RATE,
            lifetime: WAVE_LIFETIME_TICKS,
            opacity: WAVE_OPACITY,
            force_scale: WAVE_FORCE_SCALE,
            max_force: WAVE_MAX_FORCE,
            min_distance_factor: WAVE_MIN_DISTANCE_FACTOR,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TriggerConfig {
    pub hover_radius: f64,
    pub cooldown_ms: f64,
    pub retrigger_guard_ms: f64,
    /// Independent from `cooldown_ms`; converted to ticks at `frame_rate_hz`.
    pub unfill_delay_ms: f64,
    pub frame_rate_hz: f64,
    pub intersection_radius_factor: f64,
    pub max_intersection_radius: f64,
    pub hover_volume: f64,
    pub intersection_volume: f64,
    pub random_volume: f64,
    pub random_velocity: f64,
}

impl TriggerConfig {
    /// Un-fill delay expressed in whole ticks (at least one).
    pub fn unfill_ticks(&self) -> u64 {
        let ticks = (self.unfill_delay_ms * self.frame_rate_hz / 1000.0).ceil();
        (ticks as u64).max(1)
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            hover_radius: HOVER_RADIUS,
            cooldown_ms: TRIGGER_COOLDOWN_MS,
            retrigger_guard_ms: RETRIGGER_GUARD_MS,
            unfill_delay_ms: UNFILL_DELAY_MS,
            frame_rate_hz: NOMINAL_FRAME_RATE_HZ,
            intersection_radius_factor: INTERSECTION_RADIUS_FACTOR,
            max_intersection_radius: MAX_INTERSECTION_RADIUS,
            hover_volume: HOVER_VOLUME_MULTIPLIER,
            intersection_volume: INTERSECTION_VOLUME_MULTIPLIER,
            random_volume: RANDOM_VOLUME_MULTIPLIER,
            random_velocity: RANDOM_VELOCITY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MusicConfig {
    pub bpm: f64,
    pub playing_points: usize,
    pub random_stagger_sec: f64,
    pub random_chords: &'static [&'static [&'static str]],
    pub hover_chords: &'static [&'static [&'static str]],
    pub intersection_chords: &'static [&'static [&'static str]],
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            playing_points: PLAYING_POINTS,
            random_stagger_sec: RANDOM_STAGGER_SEC,
            random_chords: RANDOM_CHORDS,
            hover_chords: HOVER_CHORDS,
            intersection_chords: INTERSECTION_CHORDS,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FlowerConfig {
    pub layout: LayoutConfig,
    pub physics: PhysicsConfig,
    pub wave: WaveConfig,
    pub trigger: TriggerConfig,
    pub music: MusicConfig,
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            range: "[0, inf)",
            value,
        })
    }
}

fn open_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            range: "(0, 1)",
            value,
        })
    }
}

fn chord_table(names: &[&[&str]]) -> Result<(), ConfigError> {
    if names.is_empty() {
        return Err(ConfigError::EmptyChordTable);
    }
    if names.iter().any(|c| c.is_empty()) {
        return Err(ConfigError::EmptyChord);
    }
    parse_chords(names).map(|_| ())
}

impl FlowerConfig {
    /// Center the flower in a `width` x `height` canvas.
    pub fn centered(width: f64, height: f64) -> Self {
        let mut config = Self::default();
        config.layout.center = DVec2::new(width / 2.0, height / 2.0);
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.layout;
        if l.point_count == 0 {
            return Err(ConfigError::ZeroPointCount);
        }
        if !(l.center.x.is_finite() && l.center.y.is_finite()) {
            return Err(ConfigError::OutOfRange {
                name: "center",
                range: "finite coordinates",
                value: if l.center.x.is_finite() { l.center.y } else { l.center.x },
            });
        }
        if let AngleMode::Drift {
            initial: Some(angle),
        } = l.angle_mode
        {
            if !angle.is_finite() {
                return Err(ConfigError::OutOfRange {
                    name: "initial angle",
                    range: "finite radians",
                    value: angle,
                });
            }
        }
        positive("spacing_scale", l.spacing_scale)?;
        positive("breathing_base", l.breathing_base)?;
        non_negative("breathing_amplitude", l.breathing_amplitude)?;
        non_negative("breathing_speed", l.breathing_speed)?;
        if !l.angle_drift_per_tick.is_finite() {
            return Err(ConfigError::OutOfRange {
                name: "angle_drift_per_tick",
                range: "finite radians",
                value: l.angle_drift_per_tick,
            });
        }
        positive("base_radius", l.base_radius)?;
        positive("triggered_radius", l.triggered_radius)?;
        open_unit("radius_decay", l.radius_decay)?;
        non_negative("radius_snap", l.radius_snap)?;

        let p = &self.physics;
        if !(p.spring_strength > 0.0 && p.spring_strength <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "spring_strength",
                range: "(0, 1]",
                value: p.spring_strength,
            });
        }
        open_unit("repulsion_decay", p.repulsion_decay)?;
        positive("attraction_radius", p.attraction_radius)?;
        non_negative("attraction_strength", p.attraction_strength)?;

        let w = &self.wave;
        positive("wave initial_radius", w.initial_radius)?;
        non_negative("wave growth_rate", w.growth_rate)?;
        if w.lifetime <= 0 {
            return Err(ConfigError::ZeroLifetime(w.lifetime));
        }
        non_negative("wave opacity", w.opacity)?;
        non_negative("wave force_scale", w.force_scale)?;
        non_negative("wave max_force", w.max_force)?;
        non_negative("wave min_distance_factor", w.min_distance_factor)?;

        let t = &self.trigger;
        positive("hover_radius", t.hover_radius)?;
        non_negative("cooldown_ms", t.cooldown_ms)?;
        non_negative("retrigger_guard_ms", t.retrigger_guard_ms)?;
        if !(0.0..=MAX_UNFILL_DELAY_MS).contains(&t.unfill_delay_ms) {
            return Err(ConfigError::OutOfRange {
                name: "unfill_delay_ms",
                range: "[0, 60000]",
                value: t.unfill_delay_ms,
            });
        }
        positive("frame_rate_hz", t.frame_rate_hz)?;
        positive("intersection_radius_factor", t.intersection_radius_factor)?;
        positive("max_intersection_radius", t.max_intersection_radius)?;
        non_negative("hover_volume", t.hover_volume)?;
        non_negative("intersection_volume", t.intersection_volume)?;
        non_negative("random_volume", t.random_volume)?;
        non_negative("random_velocity", t.random_velocity)?;

        let m = &self.music;
        positive("bpm", m.bpm)?;
        non_negative("random_stagger_sec", m.random_stagger_sec)?;
        if m.playing_points > l.point_count {
            return Err(ConfigError::TooManyPlayingPoints {
                playing: m.playing_points,
                count: l.point_count,
            });
        }
        chord_table(m.random_chords)?;
        chord_table(m.hover_chords)?;
        chord_table(m.intersection_chords)?;
        Ok(())
    }
}
