//! Expanding wavefronts spawned by pointer presses.
//!
//! Each wave grows by its growth rate and loses one tick of lifetime per
//! `advance`. The first time a wave's edge passes a point it pushes that
//! point outward once; `hit_points` remembers who has been pushed.

use crate::config::WaveConfig;
use crate::constants::SPLASH_DURATION_BEATS;
use crate::field::{PointField, PointId};
use crate::sound::SoundCommand;
use crate::tone::{lifetime_ratio, splash_frequency};
use fnv::FnvHashSet;
use glam::DVec2;
use rand::Rng;

/// Stable wave identity, never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveId(pub u64);

#[derive(Clone, Debug)]
pub struct Wavefront {
    pub id: WaveId,
    pub center: DVec2,
    pub radius: f64,
    pub growth_rate: f64,
    pub lifetime: i32,
    pub initial_lifetime: i32,
    pub opacity: f64,
    hit_points: FnvHashSet<PointId>,
}

impl Wavefront {
    pub fn new(id: WaveId, center: DVec2, config: &WaveConfig) -> Self {
        Self {
            id,
            center,
            radius: config.initial_radius,
            growth_rate: config.growth_rate,
            lifetime: config.lifetime,
            initial_lifetime: config.lifetime,
            opacity: config.opacity,
            hit_points: FnvHashSet::default(),
        }
    }

    #[inline]
    pub fn has_hit(&self, id: PointId) -> bool {
        self.hit_points.contains(&id)
    }

    pub fn hit_count(&self) -> usize {
        self.hit_points.len()
    }

    #[inline]
    pub fn lifetime_ratio(&self) -> f64 {
        lifetime_ratio(self.lifetime, self.initial_lifetime)
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0
    }
}

/// Push magnitude for a point `distance` from the center of a wave of
/// `radius` that has `lifetime` of `initial_lifetime` ticks left.
///
/// Young waves push harder; the push falls off quadratically toward the
/// edge but never below `min_distance_factor`, and is capped at `max_force`.
pub fn impulse_magnitude(
    config: &WaveConfig,
    lifetime: i32,
    initial_lifetime: i32,
    distance: f64,
    radius: f64,
) -> f64 {
    let initial = initial_lifetime.max(1) as f64;
    let age = (initial_lifetime - lifetime) as f64;
    let age_factor = 1.0 - age / initial;
    let normalized = if radius > 0.0 { distance / radius } else { 1.0 };
    let distance_factor = (1.0 - normalized * normalized).max(config.min_distance_factor);
    (age_factor * distance_factor * config.force_scale).clamp(0.0, config.max_force)
}

pub struct WaveField {
    waves: Vec<Wavefront>,
    config: WaveConfig,
    next_id: u64,
}

impl WaveField {
    pub fn new(config: &WaveConfig) -> Self {
        Self {
            waves: Vec::new(),
            config: config.clone(),
            next_id: 0,
        }
    }

    /// Start a wave at `center`. Every spawn also requests the low splash tone.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        center: DVec2,
        rng: &mut R,
        out: &mut Vec<SoundCommand>,
    ) -> WaveId {
        let id = WaveId(self.next_id);
        self.next_id += 1;
        self.waves.push(Wavefront::new(id, center, &self.config));
        let frequency_hz = splash_frequency(rng);
        out.push(SoundCommand::PlayTransientTone {
            frequency_hz,
            duration_beats: SPLASH_DURATION_BEATS,
        });
        log::debug!(
            "[wave] spawn id={} at ({:.1},{:.1}) splash={:.1}Hz",
            id.0,
            center.x,
            center.y,
            frequency_hz
        );
        id
    }

    /// Grow and age every wave, push points on first crossing, then drop
    /// expired waves. Returns how many points were pushed this tick.
    pub fn advance(&mut self, field: &mut PointField, tick: u64, unfill_ticks: u64) -> usize {
        let mut pushed = 0;
        for wave in &mut self.waves {
            wave.radius += wave.growth_rate;
            wave.lifetime -= 1;
            wave.opacity = self.config.opacity * wave.lifetime_ratio();

            for id in 0..field.len() {
                if wave.hit_points.contains(&id) {
                    continue;
                }
                let offset = field.get(id).position - wave.center;
                let distance = offset.length();
                if distance >= wave.radius {
                    continue;
                }
                wave.hit_points.insert(id);
                pushed += 1;

                // A point sitting exactly on the center has no outward direction
                if distance > 0.0 {
                    let magnitude = impulse_magnitude(
                        &self.config,
                        wave.lifetime,
                        wave.initial_lifetime,
                        distance,
                        wave.radius,
                    );
                    field.apply_impulse(id, offset / distance * magnitude);
                }
                field.pulse(id);
                field.schedule_unfill(id, tick.saturating_add(unfill_ticks));
            }
        }

        let before = self.waves.len();
        self.waves.retain(|w| !w.is_expired());
        if self.waves.len() != before {
            log::debug!("[wave] expired {}", before - self.waves.len());
        }
        pushed
    }

    pub fn clear(&mut self) {
        self.waves.clear();
    }

    #[inline]
    pub fn waves(&self) -> &[Wavefront] {
        &self.waves
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }
}
