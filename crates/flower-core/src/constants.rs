// Shared tuning constants for the point field, waves and sequencer.
// Defaults in `config.rs` are built from these; hosts may override them.

// Layout
pub const DEFAULT_POINT_COUNT: usize = 200;
pub const INITIAL_SPACING_SCALE: f64 = 20.0; // spacing used for the very first layout
pub const LINEAR_SPIRAL_FACTOR: f64 = 0.07; // radius = factor * scale * i in linear mode
pub const ANGLE_DRIFT_PER_TICK: f64 = 0.00002; // radians added to the custom angle each tick

// Breathing scale: scale = base + amplitude * sin(phase)
pub const BREATHING_BASE: f64 = 30.0;
pub const BREATHING_AMPLITUDE: f64 = 3.0;
pub const BREATHING_SPEED: f64 = 0.01; // phase advance per tick

// Point visuals
pub const BASE_POINT_RADIUS: f64 = 5.0;
pub const TRIGGERED_POINT_RADIUS: f64 = 20.0;
pub const RADIUS_DECAY: f64 = 0.97; // r = decay * r + (1 - decay) * base
pub const RADIUS_SNAP: f64 = 0.5;
pub const CONNECTION_STRIDE: usize = 5; // point i links to point i + stride

// Forces
pub const SPRING_STRENGTH: f64 = 0.05;
pub const REPULSION_DECAY: f64 = 0.95;
pub const ATTRACTION_RADIUS: f64 = 250.0;
pub const ATTRACTION_STRENGTH: f64 = 0.15;

// Waves
pub const WAVE_INITIAL_RADIUS: f64 = 5.0;
pub const WAVE_GROWTH_RATE: f64 = 3.0;
pub const WAVE_LIFETIME_TICKS: i32 = 300;
pub const WAVE_OPACITY: f64 = 1.0;
pub const WAVE_FORCE_SCALE: f64 = 70.0;
pub const WAVE_MAX_FORCE: f64 = 20.0;
pub const WAVE_MIN_DISTANCE_FACTOR: f64 = 0.2;

// Splash tone fired on every wave spawn
pub const SPLASH_MIN_HZ: f64 = 100.0;
pub const SPLASH_BAND_HZ: f64 = 50.0;
pub const SPLASH_DURATION_BEATS: f64 = 2.0; // half note

// Intersections
pub const INTERSECTION_RADIUS_FACTOR: f64 = 0.2; // glow/search radius = lifetime * factor
pub const MAX_INTERSECTION_RADIUS: f64 = 60.0;
pub const POP_MIN_DB: f64 = -15.0;
pub const POP_MAX_DB: f64 = 5.0;
pub const POP_RATE_MIN: f64 = 0.6;
pub const POP_RATE_SPAN: f64 = 0.8;

// Triggering
pub const HOVER_RADIUS: f64 = 30.0;
pub const TRIGGER_COOLDOWN_MS: f64 = 100.0;
pub const RETRIGGER_GUARD_MS: f64 = 1000.0;
pub const UNFILL_DELAY_MS: f64 = 500.0;
pub const MAX_UNFILL_DELAY_MS: f64 = 60_000.0;
pub const NOMINAL_FRAME_RATE_HZ: f64 = 60.0;

// Loudness
pub const HOVER_VOLUME_MULTIPLIER: f64 = 0.1;
pub const INTERSECTION_VOLUME_MULTIPLIER: f64 = 0.3;
pub const RANDOM_VOLUME_MULTIPLIER: f64 = 1.0;
pub const RANDOM_VELOCITY: f64 = 0.03;

// Ambient random track
pub const DEFAULT_BPM: f64 = 240.0;
pub const PLAYING_POINTS: usize = 1;
pub const RANDOM_STAGGER_SEC: f64 = 0.15;

// Drone
pub const DRONE_MIN_HZ: f64 = 200.0;
pub const DRONE_MAX_HZ: f64 = 800.0;
pub const DRONE_SPEED_SCALE: f64 = 0.2;
pub const DRONE_HISTORY_LEN: usize = 10;
pub const DRONE_VARIANCE_THRESHOLD: f64 = 10.0;
pub const DRONE_START_DB: f64 = -30.0;
pub const DRONE_FLOOR_DB: f64 = -80.0;
pub const DRONE_CEILING_DB: f64 = -40.0;
pub const DRONE_STEP_DB: f64 = 1.0;

/// Golden angle in radians, `π(3 − √5)`.
#[inline]
pub fn golden_angle() -> f64 {
    std::f64::consts::PI * (3.0 - 5.0_f64.sqrt())
}
