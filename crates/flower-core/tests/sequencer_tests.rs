// Integration tests for chord cursors, trigger guards and note velocity.

use flower_core::constants::golden_angle;
use flower_core::*;

fn setup(count: usize) -> (TriggerSequencer, PointField) {
    let layout = LayoutConfig {
        point_count: count,
        ..LayoutConfig::default()
    };
    let field = PointField::new(&layout, &PhysicsConfig::default(), golden_angle(), false);
    let sequencer =
        TriggerSequencer::new(&MusicConfig::default(), &TriggerConfig::default()).unwrap();
    (sequencer, field)
}

fn note_of(cmd: &SoundCommand) -> String {
    cmd.note().expect("expected a note").to_string()
}

fn velocity_of(cmd: &SoundCommand) -> f64 {
    match cmd {
        SoundCommand::PlayNote { velocity, .. } => *velocity,
        other => panic!("expected a note, got {other:?}"),
    }
}

#[test]
fn cursor_walks_chords_and_wraps() {
    let (mut seq, _) = setup(1);
    for track in Track::ALL {
        let len = seq.track(track).cycle_len();
        assert_eq!(len, 16);
        for _ in 0..len {
            seq.advance(track);
        }
        assert_eq!(seq.track(track).cursor(), (0, 0), "{track} did not wrap");
    }
}

#[test]
fn five_ambient_triggers_follow_the_random_track() {
    let (mut seq, mut field) = setup(10);
    let notes: Vec<String> = (0..5)
        .map(|i| {
            let cmd = seq
                .fire(&mut field, i, TriggerKind::Random, 0.0, 0)
                .expect("random triggers are never rejected");
            note_of(&cmd)
        })
        .collect();
    assert_eq!(notes, ["C2", "E2", "G2", "B2", "A2"]);
}

#[test]
fn tracks_advance_independently() {
    let (mut seq, mut field) = setup(10);
    let hover = seq.fire(&mut field, 0, TriggerKind::Hover, 0.0, 0).unwrap();
    let random = seq.fire(&mut field, 1, TriggerKind::Random, 0.0, 0).unwrap();
    assert_eq!(note_of(&hover), "A2");
    assert_eq!(note_of(&random), "C2");
    assert_eq!(seq.track(Track::Intersection).cursor(), (0, 0));
    assert_eq!(seq.track(Track::Hover).cursor(), (0, 1));
}

#[test]
fn filled_point_rejects_guarded_triggers() {
    let (mut seq, mut field) = setup(3);
    assert!(seq.fire(&mut field, 2, TriggerKind::Hover, 0.0, 0).is_some());
    assert!(field.get(2).is_filled);
    assert_eq!(field.get(2).fill_expires_at_tick, Some(30));
    assert_eq!(field.get(2).radius, 20.0);

    // Filled and inside the guard
    assert!(seq.fire(&mut field, 2, TriggerKind::Hover, 500.0, 5).is_none());
    // Guard elapsed but still filled
    let kind = TriggerKind::Intersection {
        radius: 60.0,
        max_radius: 60.0,
    };
    assert!(seq.fire(&mut field, 2, kind, 5_000.0, 5).is_none());
    // Random ignores both guards
    assert!(seq.fire(&mut field, 2, TriggerKind::Random, 5_000.0, 5).is_some());
}

#[test]
fn retrigger_guard_spans_one_second() {
    let (mut seq, mut field) = setup(1);
    assert!(seq.fire(&mut field, 0, TriggerKind::Hover, 2_000.0, 0).is_some());
    field.expire_fills(30);
    assert!(!field.get(0).is_filled);

    assert!(seq.fire(&mut field, 0, TriggerKind::Hover, 2_999.0, 30).is_none());
    assert!(seq.fire(&mut field, 0, TriggerKind::Hover, 3_000.0, 30).is_some());
    assert_eq!(field.get(0).last_triggered_ms, Some(3_000.0));
}

#[test]
fn accepted_triggers_on_a_point_are_a_second_apart() {
    let (mut seq, mut field) = setup(1);
    let mut accepted = Vec::new();
    // 60 Hz for ten seconds, attempting a hover on every frame
    for tick in 0..600_u64 {
        let now = tick as f64 * 1000.0 / 60.0;
        field.expire_fills(tick);
        if seq.fire(&mut field, 0, TriggerKind::Hover, now, tick).is_some() {
            accepted.push(now);
        }
    }
    assert!(accepted.len() >= 9);
    for pair in accepted.windows(2) {
        assert!(pair[1] - pair[0] >= 1000.0, "{pair:?} too close");
    }
}

#[test]
fn random_trigger_does_not_stamp_the_guard() {
    let (mut seq, mut field) = setup(1);
    seq.fire(&mut field, 0, TriggerKind::Random, 123.0, 0).unwrap();
    assert_eq!(field.get(0).last_triggered_ms, None);
    assert!(field.get(0).is_filled);
}

#[test]
fn intersection_notes_are_louder_than_hover_notes() {
    let (mut seq, mut field) = setup(2);
    let hover = seq.fire(&mut field, 0, TriggerKind::Hover, 0.0, 0).unwrap();
    let kind = TriggerKind::Intersection {
        radius: 60.0,
        max_radius: 60.0,
    };
    let intersection = seq.fire(&mut field, 1, kind, 0.0, 0).unwrap();
    assert!((velocity_of(&hover) - 0.1).abs() < 1e-12);
    assert!((velocity_of(&intersection) - 0.3).abs() < 1e-12);
    assert!((velocity_of(&intersection) / velocity_of(&hover) - 3.0).abs() < 1e-9);
}

#[test]
fn intersection_velocity_scales_with_glow_radius() {
    let (mut seq, mut field) = setup(1);
    let kind = TriggerKind::Intersection {
        radius: 30.0,
        max_radius: 60.0,
    };
    let cmd = seq.fire(&mut field, 0, kind, 0.0, 0).unwrap();
    assert!((velocity_of(&cmd) - 0.15).abs() < 1e-12);
    match cmd {
        SoundCommand::PlayNote {
            sampler, delay_sec, ..
        } => {
            assert_eq!(sampler, Track::Intersection);
            assert_eq!(delay_sec, 0.0);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn reseed_transposes_and_restarts_every_track() {
    let (mut seq, mut field) = setup(4);
    seq.fire(&mut field, 0, TriggerKind::Random, 0.0, 0).unwrap();
    seq.fire(&mut field, 1, TriggerKind::Random, 0.0, 0).unwrap();
    seq.reseed(2);
    for track in Track::ALL {
        assert_eq!(seq.track(track).cursor(), (0, 0));
    }
    let cmd = seq.fire(&mut field, 2, TriggerKind::Random, 0.0, 0).unwrap();
    assert_eq!(note_of(&cmd), "D2");
}

#[test]
fn reset_restarts_cursors_and_cooldown() {
    let (mut seq, mut field) = setup(2);
    seq.fire(&mut field, 0, TriggerKind::Hover, 0.0, 0).unwrap();
    seq.cooldown_mut().stamp(0.0);
    seq.reset();
    assert_eq!(seq.track(Track::Hover).cursor(), (0, 0));
    assert!(seq.cooldown().is_open(1.0));
}

#[test]
fn unknown_note_names_are_rejected() {
    const BAD: &[&[&str]] = &[&["C2", "H2"]];
    let music = MusicConfig {
        hover_chords: BAD,
        ..MusicConfig::default()
    };
    let err = TriggerSequencer::new(&music, &TriggerConfig::default()).err();
    assert_eq!(err, Some(ConfigError::InvalidNote("H2".to_string())));
}

#[test]
fn huge_unfill_delay_saturates_the_expiry_tick() {
    let layout = LayoutConfig {
        point_count: 2,
        ..LayoutConfig::default()
    };
    let mut field = PointField::new(&layout, &PhysicsConfig::default(), golden_angle(), false);
    let trigger = TriggerConfig {
        unfill_delay_ms: 1e21,
        ..TriggerConfig::default()
    };
    let mut seq = TriggerSequencer::new(&MusicConfig::default(), &trigger).unwrap();
    assert_eq!(seq.unfill_ticks(), u64::MAX);

    assert!(seq.fire(&mut field, 0, TriggerKind::Hover, 0.0, 5).is_some());
    assert_eq!(field.get(0).fill_expires_at_tick, Some(u64::MAX));
    field.expire_fills(1_000_000);
    assert!(field.get(0).is_filled);
}
