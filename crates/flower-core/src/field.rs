//! Phyllotaxis point field.
//!
//! The field owns every point. Other components never hold references into
//! the point array; they go through the narrow mutation methods here
//! (`apply_impulse`, `pulse`, `fill`, `schedule_unfill`, ...). Indices are
//! fixed for the life of the field and an out-of-range `PointId` panics.

use crate::config::{LayoutConfig, PhysicsConfig, RadialMode};
use crate::constants::LINEAR_SPIRAL_FACTOR;
use glam::DVec2;

pub type PointId = usize;

/// One lattice site.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub position: DVec2,
    pub previous_position: DVec2,
    pub radius: f64,
    pub repulsion_force: DVec2,
    pub is_filled: bool,
    pub last_triggered_ms: Option<f64>,
    pub fill_expires_at_tick: Option<u64>,
}

impl Point {
    fn at(position: DVec2, radius: f64) -> Self {
        Self {
            position,
            previous_position: position,
            radius,
            repulsion_force: DVec2::ZERO,
            is_filled: false,
            last_triggered_ms: None,
            fill_expires_at_tick: None,
        }
    }
}

/// Position of point `index` on a spiral with divergence `angle`.
#[inline]
pub fn phyllotaxis_point(
    index: usize,
    angle: f64,
    scale: f64,
    mode: RadialMode,
    center: DVec2,
) -> DVec2 {
    let i = index as f64;
    let theta = i * angle;
    let r = match mode {
        RadialMode::AreaUniform => scale * i.sqrt(),
        RadialMode::Linear => LINEAR_SPIRAL_FACTOR * scale * i,
    };
    center + DVec2::new(r * theta.cos(), r * theta.sin())
}

pub struct PointField {
    points: Vec<Point>,
    layout: LayoutConfig,
    physics: PhysicsConfig,
    drifting: bool,
    seed_angle: f64,
    angle: f64,
    scale: f64,
    breathing_phase: f64,
    weighted_speed: f64,
}

impl PointField {
    /// Build and lay out the field. `seed_angle` is the divergence angle the
    /// layout starts from: the golden angle, or the once-seeded custom angle
    /// that then drifts each tick.
    pub fn new(
        layout: &LayoutConfig,
        physics: &PhysicsConfig,
        seed_angle: f64,
        drifting: bool,
    ) -> Self {
        let mut field = Self {
            points: Vec::with_capacity(layout.point_count),
            layout: layout.clone(),
            physics: physics.clone(),
            drifting,
            seed_angle,
            angle: seed_angle,
            scale: layout.spacing_scale,
            breathing_phase: 0.0,
            weighted_speed: 0.0,
        };
        field.initialize();
        field
    }

    /// Re-lay every point from the seeded angle and initial spacing.
    /// Calling it twice yields the same layout.
    pub fn initialize(&mut self) {
        self.angle = self.seed_angle;
        self.scale = self.layout.spacing_scale;
        self.breathing_phase = 0.0;
        self.weighted_speed = 0.0;
        let (angle, scale, mode, center) = (
            self.angle,
            self.scale,
            self.layout.radial_mode,
            self.layout.center,
        );
        let base_radius = self.layout.base_radius;
        self.points = (0..self.layout.point_count)
            .map(|i| Point::at(phyllotaxis_point(i, angle, scale, mode, center), base_radius))
            .collect();
    }

    /// Where point `index` wants to be under the live angle and scale.
    #[inline]
    pub fn desired_position(&self, index: PointId) -> DVec2 {
        phyllotaxis_point(
            index,
            self.angle,
            self.scale,
            self.layout.radial_mode,
            self.layout.center,
        )
    }

    /// Advance drift and breathing, then pull every point a fixed fraction of
    /// the way toward its desired position. Returns the speed estimate.
    pub fn relax(&mut self) -> f64 {
        if self.drifting {
            self.angle += self.layout.angle_drift_per_tick;
        }
        self.breathing_phase += self.layout.breathing_speed;
        self.scale =
            self.layout.breathing_base + self.layout.breathing_amplitude * self.breathing_phase.sin();

        let k = self.physics.spring_strength;
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for i in 0..self.points.len() {
            let desired = self.desired_position(i);
            let p = &mut self.points[i];
            p.position += (desired - p.position) * k;

            // Squared-speed weights let a few fast points dominate the mean
            let speed = p.position.distance(p.previous_position);
            let weight = speed * speed;
            weighted += speed * weight;
            total_weight += weight;
            p.previous_position = p.position;
        }
        self.weighted_speed = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        };
        self.weighted_speed
    }

    /// Move every point by its accumulated repulsion, then decay the force.
    pub fn apply_repulsion(&mut self) {
        let decay = self.physics.repulsion_decay;
        for p in &mut self.points {
            p.position += p.repulsion_force;
            p.repulsion_force *= decay;
        }
    }

    /// Pull points within `radius` of `target` toward it, with influence
    /// falling off linearly to zero at the edge.
    pub fn apply_attraction(&mut self, target: DVec2, radius: f64, strength: f64) {
        for p in &mut self.points {
            let delta = target - p.position;
            let distance = delta.length();
            if distance < radius {
                let influence = 1.0 - distance / radius;
                p.position += delta * influence * strength;
            }
        }
    }

    /// Shrink pulsed points back toward the base radius.
    pub fn decay_radii(&mut self) {
        let base = self.layout.base_radius;
        let decay = self.layout.radius_decay;
        let snap = self.layout.radius_snap;
        for p in &mut self.points {
            if p.radius > base {
                p.radius = p.radius * decay + base * (1.0 - decay);
                if (p.radius - base).abs() < snap {
                    p.radius = base;
                }
            }
        }
    }

    /// Clear fills whose expiry tick has been reached.
    pub fn expire_fills(&mut self, tick: u64) {
        for p in &mut self.points {
            if matches!(p.fill_expires_at_tick, Some(at) if tick >= at) {
                p.is_filled = false;
                p.fill_expires_at_tick = None;
            }
        }
    }

    #[inline]
    pub fn apply_impulse(&mut self, id: PointId, impulse: DVec2) {
        self.points[id].repulsion_force += impulse;
    }

    #[inline]
    pub fn pulse(&mut self, id: PointId) {
        self.points[id].radius = self.layout.triggered_radius;
    }

    /// Fill the point until `expires_at_tick`, replacing any earlier expiry.
    pub fn fill(&mut self, id: PointId, expires_at_tick: u64) {
        let p = &mut self.points[id];
        p.is_filled = true;
        p.fill_expires_at_tick = Some(expires_at_tick);
    }

    pub fn stamp_triggered(&mut self, id: PointId, now_ms: f64) {
        self.points[id].last_triggered_ms = Some(now_ms);
    }

    /// Make sure a filled point clears no later than `at_tick`.
    pub fn schedule_unfill(&mut self, id: PointId, at_tick: u64) {
        let p = &mut self.points[id];
        if p.is_filled {
            p.fill_expires_at_tick = Some(p.fill_expires_at_tick.map_or(at_tick, |t| t.min(at_tick)));
        }
    }

    /// First point (by index) strictly closer than `radius` to `pos`.
    pub fn first_within(&self, pos: DVec2, radius: f64) -> Option<PointId> {
        self.points
            .iter()
            .position(|p| p.position.distance(pos) < radius)
    }

    #[inline]
    pub fn get(&self, id: PointId) -> &Point {
        &self.points[id]
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn center(&self) -> DVec2 {
        self.layout.center
    }

    /// Mean point speed of the last `relax`, weighted by squared speed.
    pub fn weighted_speed(&self) -> f64 {
        self.weighted_speed
    }
}
