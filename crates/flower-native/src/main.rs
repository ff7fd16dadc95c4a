//! Headless session: replays a scripted set of gestures against the flower at
//! a fixed 60 Hz and logs every sound request.
//!
//! Usage: `flower-native [seed] [seconds]`

use anyhow::Context;
use flower_core::{
    dispatch_all, FlowerConfig, Metronome, Note, PointerEvent, Simulation, SoundCommand,
    SoundEngine, Track,
};
use glam::DVec2;
use std::time::Duration;

const WIDTH: f64 = 1280.0;
const HEIGHT: f64 = 720.0;
const FRAME_HZ: f64 = 60.0;

/// Prints sound requests instead of playing them and keeps a tally.
#[derive(Default)]
struct LogSoundEngine {
    notes: [usize; 3],
    tones: usize,
    pops: usize,
}

impl SoundEngine for LogSoundEngine {
    fn play_note(&mut self, note: Note, velocity: f64, sampler: Track, delay_sec: f64) {
        self.notes[sampler.index()] += 1;
        log::info!(
            "[note] {:<12} {:>4} ({:7.2} Hz) vel={:.3} delay={:.2}s",
            sampler.name(),
            note.to_string(),
            note.hz(),
            velocity,
            delay_sec
        );
    }

    fn play_transient_tone(&mut self, frequency_hz: f64, duration_beats: f64) {
        self.tones += 1;
        log::info!("[tone] {:.1} Hz for {} beats", frequency_hz, duration_beats);
    }

    fn play_pop(&mut self, volume: f64, gain_db: f64, playback_rate: f64) {
        self.pops += 1;
        log::info!(
            "[pop] vol={:.2} gain={:+.1} dB rate={:.2}",
            volume,
            gain_db,
            playback_rate
        );
    }
}

/// One scripted gesture: press at `from`, drag to `to` over `frames`, release.
struct Gesture {
    start_frame: u64,
    frames: u64,
    from: DVec2,
    to: DVec2,
}

impl Gesture {
    fn events(&self, frame: u64) -> Vec<PointerEvent> {
        if frame < self.start_frame || frame > self.start_frame + self.frames {
            return Vec::new();
        }
        let t = (frame - self.start_frame) as f64 / self.frames.max(1) as f64;
        let p = self.from.lerp(self.to, t);
        let mut events = Vec::with_capacity(2);
        if frame == self.start_frame {
            events.push(PointerEvent::Down { x: p.x, y: p.y });
        }
        events.push(PointerEvent::Move { x: p.x, y: p.y });
        if frame == self.start_frame + self.frames {
            events.push(PointerEvent::Up);
        }
        events
    }
}

fn script(center: DVec2) -> Vec<Gesture> {
    vec![
        // Two taps either side of the center so their waves cross over the flower
        Gesture {
            start_frame: 30,
            frames: 1,
            from: center - DVec2::new(60.0, 0.0),
            to: center - DVec2::new(60.0, 0.0),
        },
        Gesture {
            start_frame: 40,
            frames: 1,
            from: center + DVec2::new(60.0, 0.0),
            to: center + DVec2::new(60.0, 0.0),
        },
        // Slow drag through the middle
        Gesture {
            start_frame: 200,
            frames: 120,
            from: center + DVec2::new(-200.0, -150.0),
            to: center + DVec2::new(200.0, 150.0),
        },
    ]
}

fn parse_args() -> anyhow::Result<(u64, f64)> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid seed {s:?}"))?,
        None => 42,
    };
    let seconds = match args.next() {
        Some(s) => s
            .parse()
            .with_context(|| format!("invalid duration {s:?}"))?,
        None => 10.0,
    };
    anyhow::ensure!(seconds > 0.0, "duration must be positive");
    Ok((seed, seconds))
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let (seed, seconds) = parse_args()?;
    let config = FlowerConfig::centered(WIDTH, HEIGHT);
    let center = config.layout.center;
    let mut metronome = Metronome::new(config.music.bpm);
    let mut sim = Simulation::new(config, seed).context("building simulation")?;
    let gestures = script(center);

    let mut engine = LogSoundEngine::default();
    let mut commands: Vec<SoundCommand> = Vec::new();
    let frame_dt = Duration::from_secs_f64(1.0 / FRAME_HZ);
    let total_frames = (seconds * FRAME_HZ).round() as u64;

    for frame in 0..total_frames {
        let now_ms = frame as f64 * 1000.0 / FRAME_HZ;
        for gesture in &gestures {
            for event in gesture.events(frame) {
                sim.pointer(event, &mut commands);
            }
        }
        for _ in 0..metronome.tick(frame_dt) {
            sim.beat(&mut commands);
        }
        sim.advance(now_ms, &mut commands);
        dispatch_all(&mut commands, &mut engine);

        if frame % FRAME_HZ as u64 == 0 {
            let drone = sim.drone();
            log::debug!(
                "[drone] t={:.1}s speed={:.3} {:.1} Hz {:.1} dB",
                now_ms / 1000.0,
                drone.weighted_speed,
                drone.frequency_hz,
                drone.volume_db
            );
        }
    }

    log::info!(
        "[session] {} ticks: random={} hover={} intersection={} tones={} pops={}",
        sim.tick(),
        engine.notes[Track::Random.index()],
        engine.notes[Track::Hover.index()],
        engine.notes[Track::Intersection.index()],
        engine.tones,
        engine.pops
    );
    Ok(())
}
