//! Pairwise wavefront intersections.
//!
//! Two waves overlap while their circles cross at two points. The detector
//! pops each pair once per overlap episode, reports both crossing sites for
//! drawing, and, when the shared trigger cooldown is open, picks at most one
//! field point near a crossing to play an intersection note.

use crate::config::TriggerConfig;
use crate::field::{PointField, PointId};
use crate::sequencer::CooldownClock;
use crate::waves::{WaveId, Wavefront};
use fnv::FnvHashSet;
use glam::DVec2;
use smallvec::SmallVec;

/// `true` iff circles `(c1, r1)` and `(c2, r2)` cross at two points:
/// `|r1 − r2| < d < r1 + r2` with `d > 0`.
#[inline]
pub fn circles_intersect(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> bool {
    let d = c1.distance(c2);
    d > 0.0 && d < r1 + r2 && d > (r1 - r2).abs()
}

/// Both crossing points of two circles, or `None` when they do not cross
/// (including concentric circles).
///
/// `a` is the distance from `c1` to the chord midpoint along the center line
/// and `h` the half chord length; the points sit at `±h` perpendicular to the
/// center line.
pub fn circle_intersections(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> Option<[DVec2; 2]> {
    if !circles_intersect(c1, r1, c2, r2) {
        return None;
    }
    let delta = c2 - c1;
    let d = delta.length();
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let mid = c1 + delta * (a / d);
    let perp = DVec2::new(delta.y, -delta.x) * (h / d);
    Some([mid + perp, mid - perp])
}

/// One crossing point of an overlapping pair, drawn as a glow of `radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionSite {
    pub position: DVec2,
    pub radius: f64,
}

/// A pair that just started overlapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopEvent {
    pub pair: (WaveId, WaveId),
    /// Remaining life fraction of the smaller wave, in `[0, 1]`.
    pub volume: f64,
}

/// Field point chosen for an intersection note.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionTrigger {
    pub point: PointId,
    pub radius: f64,
    pub max_radius: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    pub pops: SmallVec<[PopEvent; 4]>,
    pub sites: SmallVec<[IntersectionSite; 8]>,
    pub trigger: Option<IntersectionTrigger>,
}

#[inline]
fn pair_key(a: WaveId, b: WaveId) -> (WaveId, WaveId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub struct IntersectionDetector {
    popped: FnvHashSet<(WaveId, WaveId)>,
    radius_factor: f64,
    max_radius: f64,
}

impl IntersectionDetector {
    pub fn new(config: &TriggerConfig) -> Self {
        Self {
            popped: FnvHashSet::default(),
            radius_factor: config.intersection_radius_factor,
            max_radius: config.max_intersection_radius,
        }
    }

    /// Scan all pairs of live waves.
    ///
    /// Pops fire on the non-overlap to overlap transition of a pair. The
    /// note trigger is subject to `cooldown`; once a point is found the
    /// cooldown is stamped and no further triggers are searched this scan.
    pub fn scan(
        &mut self,
        waves: &[Wavefront],
        field: &PointField,
        cooldown: &mut CooldownClock,
        now_ms: f64,
    ) -> ScanReport {
        let mut report = ScanReport::default();
        let mut overlapping = FnvHashSet::default();
        let mut cooldown_open = cooldown.is_open(now_ms);

        for (i, first) in waves.iter().enumerate() {
            for second in &waves[i + 1..] {
                let Some(crossings) =
                    circle_intersections(first.center, first.radius, second.center, second.radius)
                else {
                    continue;
                };

                let key = pair_key(first.id, second.id);
                overlapping.insert(key);
                if !self.popped.contains(&key) {
                    let smaller = if first.radius <= second.radius {
                        first
                    } else {
                        second
                    };
                    report.pops.push(PopEvent {
                        pair: key,
                        volume: smaller.lifetime_ratio(),
                    });
                }

                // Glow and search radius follow the older wave of the pair
                let radius = first.lifetime.max(0) as f64 * self.radius_factor;
                for position in crossings {
                    report.sites.push(IntersectionSite { position, radius });
                }

                if !cooldown_open {
                    continue;
                }
                if let Some(point) = crossings
                    .iter()
                    .find_map(|&c| field.first_within(c, radius))
                {
                    cooldown.stamp(now_ms);
                    cooldown_open = false;
                    report.trigger = Some(IntersectionTrigger {
                        point,
                        radius,
                        max_radius: self.max_radius,
                    });
                }
            }
        }

        // Pairs that stopped overlapping (or lost a wave) may pop again later
        self.popped = overlapping;
        report
    }

    /// Pairs currently overlapping that have already popped.
    pub fn popped_pairs(&self) -> usize {
        self.popped.len()
    }

    pub fn clear(&mut self) {
        self.popped.clear();
    }
}
