// Integration tests for wave-pair intersection geometry, pop episodes and
// cooldown-limited intersection triggers.

use flower_core::constants::golden_angle;
use flower_core::*;
use glam::DVec2;
use proptest::prelude::*;

fn wave(id: u64, x: f64, y: f64, radius: f64) -> Wavefront {
    let mut w = Wavefront::new(WaveId(id), DVec2::new(x, y), &WaveConfig::default());
    w.radius = radius;
    w
}

fn field_at(center: DVec2) -> PointField {
    let layout = LayoutConfig {
        center,
        ..LayoutConfig::default()
    };
    PointField::new(&layout, &PhysicsConfig::default(), golden_angle(), false)
}

fn far_field() -> PointField {
    field_at(DVec2::new(1e6, 1e6))
}

#[test]
fn equal_circles_cross_symmetrically_about_the_center_line() {
    let c1 = DVec2::new(0.0, 0.0);
    let c2 = DVec2::new(10.0, 0.0);
    assert!(circles_intersect(c1, 6.0, c2, 6.0));
    let [p, q] = circle_intersections(c1, 6.0, c2, 6.0).expect("0 < 10 < 12");

    let mid = (c1 + c2) / 2.0;
    let h = 11.0_f64.sqrt();
    // Mirror images across the segment joining the centers
    assert!((p.x - q.x).abs() < 1e-12);
    assert!((p.y + q.y).abs() < 1e-12);
    assert!((p.distance(mid) - h).abs() < 1e-12);
    assert!((q.distance(mid) - h).abs() < 1e-12);
    assert!((p.x - 5.0).abs() < 1e-12);
}

proptest! {
    #[test]
    fn intersect_iff_radii_bracket_distance(
        r1 in 0.1_f64..100.0,
        r2 in 0.1_f64..100.0,
        d in 0.0_f64..250.0,
        theta in 0.0_f64..std::f64::consts::TAU,
    ) {
        // Stay clear of tangency where rounding decides the answer
        prop_assume!((d - (r1 + r2)).abs() > 1e-6);
        prop_assume!((d - (r1 - r2).abs()).abs() > 1e-6);

        let c1 = DVec2::new(3.0, -7.0);
        let c2 = c1 + DVec2::new(theta.cos(), theta.sin()) * d;
        let expected = (r1 - r2).abs() < d && d < r1 + r2;
        prop_assert_eq!(circles_intersect(c1, r1, c2, r2), expected);

        match circle_intersections(c1, r1, c2, r2) {
            Some(points) => {
                prop_assert!(expected);
                for p in points {
                    prop_assert!((p.distance(c1) - r1).abs() < 1e-6);
                    prop_assert!((p.distance(c2) - r2).abs() < 1e-6);
                }
            }
            None => prop_assert!(!expected),
        }
    }
}

#[test]
fn pair_pops_once_per_overlap_episode() {
    let field = far_field();
    let mut detector = IntersectionDetector::new(&TriggerConfig::default());
    let mut cooldown = CooldownClock::new(100.0);

    let mut waves = vec![wave(0, 0.0, 0.0, 6.0), wave(1, 10.0, 0.0, 6.0)];
    let report = detector.scan(&waves, &field, &mut cooldown, 0.0);
    assert_eq!(report.pops.len(), 1);
    assert_eq!(report.pops[0].pair, (WaveId(0), WaveId(1)));
    assert_eq!(report.sites.len(), 2);

    for t in 1..20 {
        let report = detector.scan(&waves, &field, &mut cooldown, t as f64 * 16.0);
        assert!(report.pops.is_empty(), "pair popped again while overlapping");
        assert_eq!(report.sites.len(), 2);
    }

    // Separate: the episode ends
    waves[0].radius = 2.0;
    waves[1].radius = 2.0;
    let report = detector.scan(&waves, &field, &mut cooldown, 400.0);
    assert!(report.pops.is_empty());
    assert!(report.sites.is_empty());
    assert_eq!(detector.popped_pairs(), 0);

    // Overlap again: a new episode pops
    waves[0].radius = 6.0;
    waves[1].radius = 6.0;
    let report = detector.scan(&waves, &field, &mut cooldown, 416.0);
    assert_eq!(report.pops.len(), 1);
}

#[test]
fn removed_wave_releases_its_pairs() {
    let field = far_field();
    let mut detector = IntersectionDetector::new(&TriggerConfig::default());
    let mut cooldown = CooldownClock::new(100.0);
    let a = wave(3, 0.0, 0.0, 6.0);
    let b = wave(9, 10.0, 0.0, 6.0);

    assert_eq!(detector.scan(&[a.clone(), b.clone()], &field, &mut cooldown, 0.0).pops.len(), 1);
    detector.scan(&[a.clone()], &field, &mut cooldown, 16.0);
    assert_eq!(detector.popped_pairs(), 0);
    // Reordering the slice does not change pair identity
    assert_eq!(detector.scan(&[b, a], &field, &mut cooldown, 32.0).pops.len(), 1);
}

#[test]
fn pop_volume_follows_the_smaller_wave() {
    let field = far_field();
    let mut detector = IntersectionDetector::new(&TriggerConfig::default());
    let mut cooldown = CooldownClock::new(100.0);
    let mut small = wave(0, 0.0, 0.0, 6.0);
    small.lifetime = 90;
    let mut large = wave(1, 10.0, 0.0, 8.0);
    large.lifetime = 150;

    let report = detector.scan(&[large, small], &field, &mut cooldown, 0.0);
    assert_eq!(report.pops.len(), 1);
    assert!((report.pops[0].volume - 0.3).abs() < 1e-12);
}

#[test]
fn concentric_waves_are_ignored() {
    let field = far_field();
    let mut detector = IntersectionDetector::new(&TriggerConfig::default());
    let mut cooldown = CooldownClock::new(100.0);
    let report = detector.scan(
        &[wave(0, 1.0, 1.0, 6.0), wave(1, 1.0, 1.0, 6.0)],
        &field,
        &mut cooldown,
        0.0,
    );
    assert!(report.pops.is_empty());
    assert!(report.sites.is_empty());
    assert!(report.trigger.is_none());
}

#[test]
fn at_most_one_trigger_per_cooldown_window() {
    // Put the field's center point right on a crossing of the first pair
    let crossing = DVec2::new(5.0, -(11.0_f64.sqrt()));
    let field = field_at(crossing);
    let mut detector = IntersectionDetector::new(&TriggerConfig::default());
    let mut cooldown = CooldownClock::new(100.0);
    let waves = vec![
        wave(0, 0.0, 0.0, 6.0),
        wave(1, 10.0, 0.0, 6.0),
        wave(2, 5.0, 5.0, 6.0),
    ];

    let report = detector.scan(&waves, &field, &mut cooldown, 1_000.0);
    let trigger = report.trigger.expect("a point sits on a crossing");
    assert_eq!(trigger.point, 0);
    assert_eq!(trigger.radius, 300.0 * 0.2);
    assert_eq!(trigger.max_radius, 60.0);
    assert_eq!(cooldown.last(), Some(1_000.0));
    assert_eq!(report.pops.len(), 3, "pops are not limited by the cooldown");

    let report = detector.scan(&waves, &field, &mut cooldown, 1_050.0);
    assert!(report.trigger.is_none());
    let report = detector.scan(&waves, &field, &mut cooldown, 1_100.0);
    assert!(report.trigger.is_some());
}

#[test]
fn no_trigger_when_no_point_is_near_a_crossing() {
    let field = far_field();
    let mut detector = IntersectionDetector::new(&TriggerConfig::default());
    let mut cooldown = CooldownClock::new(100.0);
    let report = detector.scan(
        &[wave(0, 0.0, 0.0, 6.0), wave(1, 10.0, 0.0, 6.0)],
        &field,
        &mut cooldown,
        0.0,
    );
    assert!(report.trigger.is_none());
    assert_eq!(cooldown.last(), None);
}
