//! Tick orchestration.
//!
//! `Simulation` owns every component and runs one frame per `advance`:
//!
//! 1. clear expired fills
//! 2. relax points toward the drifting layout, update the drone
//! 3. drag attraction (while the pointer is down)
//! 4. shrink pulsed radii
//! 5. grow and age waves, push newly crossed points
//! 6. apply and decay repulsion
//! 7. hover scan (once per pointer move)
//! 8. intersection scan: pops, glow sites, at most one note
//!
//! All sound output is appended to the caller's buffer.

use crate::config::{AngleMode, ConfigError, FlowerConfig};
use crate::constants::golden_angle;
use crate::field::{Point, PointField};
use crate::intersect::{IntersectionDetector, IntersectionSite};
use crate::sequencer::{TriggerKind, TriggerSequencer};
use crate::sound::SoundCommand;
use crate::tone::{self, DroneLevel, DroneTracker};
use crate::waves::{WaveField, WaveId, Wavefront};
use glam::DVec2;
use rand::prelude::*;
use smallvec::SmallVec;

/// Pointer input in local canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
}

pub struct Simulation {
    config: FlowerConfig,
    field: PointField,
    waves: WaveField,
    detector: IntersectionDetector,
    sequencer: TriggerSequencer,
    drone: DroneTracker,
    rng: StdRng,
    tick: u64,
    cursor: Option<DVec2>,
    hover_pending: bool,
    dragging: bool,
    sites: SmallVec<[IntersectionSite; 8]>,
}

impl Simulation {
    /// Validate `config` and lay out the field. `seed` drives every random
    /// choice (drift angle, splash pitch, pop rate, ambient points).
    pub fn new(config: FlowerConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let (seed_angle, drifting) = match config.layout.angle_mode {
            AngleMode::Golden => (golden_angle(), false),
            AngleMode::Drift { initial: Some(a) } => (a, true),
            AngleMode::Drift { initial: None } => (rng.gen::<f64>() * std::f64::consts::TAU, true),
        };
        let field = PointField::new(&config.layout, &config.physics, seed_angle, drifting);
        let waves = WaveField::new(&config.wave);
        let detector = IntersectionDetector::new(&config.trigger);
        let sequencer = TriggerSequencer::new(&config.music, &config.trigger)?;
        log::info!(
            "[sim] points={} angle={:.5} drifting={} unfill_ticks={}",
            field.len(),
            seed_angle,
            drifting,
            sequencer.unfill_ticks()
        );
        Ok(Self {
            config,
            field,
            waves,
            detector,
            sequencer,
            drone: DroneTracker::default(),
            rng,
            tick: 0,
            cursor: None,
            hover_pending: false,
            dragging: false,
            sites: SmallVec::new(),
        })
    }

    /// Feed one pointer event. A press spawns a wave (and its splash tone)
    /// and starts a drag; moves update the drag target and request a hover
    /// scan on the next tick.
    pub fn pointer(&mut self, event: PointerEvent, out: &mut Vec<SoundCommand>) -> Option<WaveId> {
        match event {
            PointerEvent::Down { x, y } => {
                let pos = DVec2::new(x, y);
                self.cursor = Some(pos);
                self.dragging = true;
                Some(self.waves.spawn(pos, &mut self.rng, out))
            }
            PointerEvent::Move { x, y } => {
                self.cursor = Some(DVec2::new(x, y));
                self.hover_pending = true;
                None
            }
            PointerEvent::Up => {
                self.dragging = false;
                None
            }
        }
    }

    /// Run one frame at host time `now_ms`.
    pub fn advance(&mut self, now_ms: f64, out: &mut Vec<SoundCommand>) {
        self.tick += 1;
        let tick = self.tick;

        self.field.expire_fills(tick);
        let speed = self.field.relax();
        self.drone.update(speed);

        if self.dragging {
            if let Some(target) = self.cursor {
                let physics = &self.config.physics;
                self.field
                    .apply_attraction(target, physics.attraction_radius, physics.attraction_strength);
            }
        }

        self.field.decay_radii();
        self.waves
            .advance(&mut self.field, tick, self.sequencer.unfill_ticks());
        self.field.apply_repulsion();

        if std::mem::take(&mut self.hover_pending) {
            self.scan_hover(now_ms, out);
        }

        let report = self.detector.scan(
            self.waves.waves(),
            &self.field,
            self.sequencer.cooldown_mut(),
            now_ms,
        );
        for pop in &report.pops {
            out.push(SoundCommand::PlayPop {
                volume: pop.volume,
                gain_db: tone::pop_gain_db(pop.volume),
                playback_rate: tone::pop_playback_rate(&mut self.rng),
            });
        }
        if let Some(hit) = report.trigger {
            let kind = TriggerKind::Intersection {
                radius: hit.radius,
                max_radius: hit.max_radius,
            };
            if let Some(cmd) = self.sequencer.fire(&mut self.field, hit.point, kind, now_ms, tick) {
                out.push(cmd);
            }
        }
        self.sites = report.sites;
    }

    fn scan_hover(&mut self, now_ms: f64, out: &mut Vec<SoundCommand>) {
        let Some(cursor) = self.cursor else {
            return;
        };
        if !self.sequencer.cooldown().is_open(now_ms) {
            return;
        }
        if let Some(id) = self
            .field
            .first_within(cursor, self.config.trigger.hover_radius)
        {
            self.sequencer.cooldown_mut().stamp(now_ms);
            if let Some(cmd) =
                self.sequencer
                    .fire(&mut self.field, id, TriggerKind::Hover, now_ms, self.tick)
            {
                out.push(cmd);
            }
        }
    }

    /// Ambient beat from the host's metronome: sound `playing_points`
    /// distinct random points, staggered.
    pub fn beat(&mut self, out: &mut Vec<SoundCommand>) {
        let count = self.config.music.playing_points.min(self.field.len());
        let stagger = self.config.music.random_stagger_sec;
        let picks = rand::seq::index::sample(&mut self.rng, self.field.len(), count);
        for (k, id) in picks.into_iter().enumerate() {
            if let Some(mut cmd) =
                self.sequencer
                    .fire(&mut self.field, id, TriggerKind::Random, 0.0, self.tick)
            {
                if let SoundCommand::PlayNote { delay_sec, .. } = &mut cmd {
                    *delay_sec = k as f64 * stagger;
                }
                out.push(cmd);
            }
        }
    }

    /// Transpose every chord track by `semitones`; cursors restart.
    pub fn reseed_chords(&mut self, semitones: i32) {
        self.sequencer.reseed(semitones);
        log::info!("[sim] chords transposed by {semitones} semitones");
    }

    /// Back to the initial layout with no waves, fills, cursors or cooldown.
    pub fn reset(&mut self) {
        self.field.initialize();
        self.waves.clear();
        self.detector.clear();
        self.sequencer.reset();
        self.drone = DroneTracker::default();
        self.cursor = None;
        self.hover_pending = false;
        self.dragging = false;
        self.sites.clear();
        log::info!("[sim] reset at tick {}", self.tick);
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        self.field.points()
    }

    #[inline]
    pub fn field(&self) -> &PointField {
        &self.field
    }

    #[inline]
    pub fn waves(&self) -> &[Wavefront] {
        self.waves.waves()
    }

    /// Crossing sites found by the last tick.
    #[inline]
    pub fn intersection_sites(&self) -> &[IntersectionSite] {
        &self.sites
    }

    pub fn sequencer(&self) -> &TriggerSequencer {
        &self.sequencer
    }

    pub fn drone(&self) -> DroneLevel {
        self.drone.level()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn config(&self) -> &FlowerConfig {
        &self.config
    }
}
