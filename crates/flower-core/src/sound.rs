use crate::music::{Note, Track};

/// A playback request produced by the simulation for the host's sound engine.
///
/// - `PlayNote`: sampled note on the sampler of `sampler`, `delay_sec` after now
/// - `PlayTransientTone`: one-shot low tone fired for every wave spawn
/// - `PlayPop`: percussive pop fired once per wave-overlap episode
#[derive(Clone, Debug, PartialEq)]
pub enum SoundCommand {
    PlayNote {
        note: Note,
        velocity: f64,
        sampler: Track,
        delay_sec: f64,
    },
    PlayTransientTone {
        frequency_hz: f64,
        duration_beats: f64,
    },
    PlayPop {
        volume: f64,
        gain_db: f64,
        playback_rate: f64,
    },
}

/// Playback backend implemented by the host.
pub trait SoundEngine {
    fn play_note(&mut self, note: Note, velocity: f64, sampler: Track, delay_sec: f64);
    fn play_transient_tone(&mut self, frequency_hz: f64, duration_beats: f64);
    fn play_pop(&mut self, volume: f64, gain_db: f64, playback_rate: f64);
}

impl SoundCommand {
    pub fn dispatch<E: SoundEngine + ?Sized>(&self, engine: &mut E) {
        match *self {
            SoundCommand::PlayNote {
                note,
                velocity,
                sampler,
                delay_sec,
            } => engine.play_note(note, velocity, sampler, delay_sec),
            SoundCommand::PlayTransientTone {
                frequency_hz,
                duration_beats,
            } => engine.play_transient_tone(frequency_hz, duration_beats),
            SoundCommand::PlayPop {
                volume,
                gain_db,
                playback_rate,
            } => engine.play_pop(volume, gain_db, playback_rate),
        }
    }

    /// The note, if this is a `PlayNote`.
    pub fn note(&self) -> Option<Note> {
        match self {
            SoundCommand::PlayNote { note, .. } => Some(*note),
            _ => None,
        }
    }
}

/// Send every command to `engine`, draining the buffer.
pub fn dispatch_all<E: SoundEngine + ?Sized>(commands: &mut Vec<SoundCommand>, engine: &mut E) {
    for command in commands.drain(..) {
        command.dispatch(engine);
    }
}
