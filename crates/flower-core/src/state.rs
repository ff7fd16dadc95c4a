//! Render-side snapshots of the simulation.
//!
//! The renderer only needs read access; these packed instances let a GPU or
//! JS host upload points and waves as flat `f32` buffers without knowing the
//! simulation types.

use crate::field::Point;
use crate::intersect::IntersectionSite;
use crate::waves::Wavefront;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub pos: [f32; 2],
    pub radius: f32,
    /// 1.0 while the point glows, else 0.0.
    pub filled: f32,
}

impl From<&Point> for PointInstance {
    fn from(p: &Point) -> Self {
        Self {
            pos: [p.position.x as f32, p.position.y as f32],
            radius: p.radius as f32,
            filled: if p.is_filled { 1.0 } else { 0.0 },
        }
    }
}

/// Expanding ring; also used for intersection glows (opacity 1).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WaveInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub opacity: f32,
}

impl From<&Wavefront> for WaveInstance {
    fn from(w: &Wavefront) -> Self {
        Self {
            center: [w.center.x as f32, w.center.y as f32],
            radius: w.radius as f32,
            opacity: w.opacity as f32,
        }
    }
}

impl From<&IntersectionSite> for WaveInstance {
    fn from(s: &IntersectionSite) -> Self {
        Self {
            center: [s.position.x as f32, s.position.y as f32],
            radius: s.radius as f32,
            opacity: 1.0,
        }
    }
}

pub fn point_instances(points: &[Point]) -> Vec<PointInstance> {
    points.iter().map(PointInstance::from).collect()
}

pub fn wave_instances(waves: &[Wavefront]) -> Vec<WaveInstance> {
    waves.iter().map(WaveInstance::from).collect()
}

pub fn site_instances(sites: &[IntersectionSite]) -> Vec<WaveInstance> {
    sites.iter().map(WaveInstance::from).collect()
}

/// Index pairs for the connective lines: point `i` links to `i + stride`.
pub fn connections(count: usize, stride: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..count.saturating_sub(stride)).map(move |i| (i, i + stride))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn connections_skip_the_tail() {
        let pairs: Vec<_> = connections(8, 5).collect();
        assert_eq!(pairs, [(0, 5), (1, 6), (2, 7)]);
        assert_eq!(connections(3, 5).count(), 0);
    }

    #[test]
    fn sites_flatten_to_four_floats() {
        let sites = [IntersectionSite {
            position: DVec2::new(1.5, -2.0),
            radius: 12.0,
        }];
        let instances = site_instances(&sites);
        let flat: &[f32] = bytemuck::cast_slice(&instances);
        assert_eq!(flat, [1.5, -2.0, 12.0, 1.0]);
    }
}
