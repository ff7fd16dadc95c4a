use crate::config::{ConfigError, MusicConfig, TriggerConfig};
use crate::field::{Point, PointField, PointId};
use crate::music::{ChordTrack, Note, Track};
use crate::sound::SoundCommand;
use crate::tone;

/// What caused a point to sound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerKind {
    /// Cursor passed near the point.
    Hover,
    /// Two wavefronts cross near the point; louder for larger glows.
    Intersection { radius: f64, max_radius: f64 },
    /// Ambient beat; ignores the fill and retrigger guards.
    Random,
}

impl TriggerKind {
    pub fn track(&self) -> Track {
        match self {
            TriggerKind::Hover => Track::Hover,
            TriggerKind::Intersection { .. } => Track::Intersection,
            TriggerKind::Random => Track::Random,
        }
    }
}

/// Global debounce shared by hover and intersection triggers.
#[derive(Clone, Debug)]
pub struct CooldownClock {
    cooldown_ms: f64,
    last_ms: Option<f64>,
}

impl CooldownClock {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            last_ms: None,
        }
    }

    #[inline]
    pub fn is_open(&self, now_ms: f64) -> bool {
        self.last_ms
            .map_or(true, |last| now_ms - last >= self.cooldown_ms)
    }

    #[inline]
    pub fn stamp(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    pub fn last(&self) -> Option<f64> {
        self.last_ms
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Chord cursors for the three tracks plus the trigger guards.
///
/// `fire` is the only place a point becomes filled by a note. Guarded kinds
/// (hover, intersection) are rejected silently while the point is filled or
/// within `retrigger_guard_ms` of its previous trigger.
pub struct TriggerSequencer {
    tracks: [ChordTrack; 3],
    cooldown: CooldownClock,
    config: TriggerConfig,
    unfill_ticks: u64,
}

impl TriggerSequencer {
    pub fn new(music: &MusicConfig, trigger: &TriggerConfig) -> Result<Self, ConfigError> {
        let tracks = [
            ChordTrack::from_names(music.random_chords)?,
            ChordTrack::from_names(music.hover_chords)?,
            ChordTrack::from_names(music.intersection_chords)?,
        ];
        Ok(Self {
            tracks,
            cooldown: CooldownClock::new(trigger.cooldown_ms),
            config: trigger.clone(),
            unfill_ticks: trigger.unfill_ticks(),
        })
    }

    /// Note under the track's cursor; steps the cursor.
    pub fn advance(&mut self, track: Track) -> Note {
        self.tracks[track.index()].advance()
    }

    pub fn track(&self, track: Track) -> &ChordTrack {
        &self.tracks[track.index()]
    }

    pub fn cooldown(&self) -> &CooldownClock {
        &self.cooldown
    }

    pub fn cooldown_mut(&mut self) -> &mut CooldownClock {
        &mut self.cooldown
    }

    pub fn unfill_ticks(&self) -> u64 {
        self.unfill_ticks
    }

    /// Whether `kind` may sound `point` at `now_ms`.
    pub fn accepts(&self, point: &Point, kind: &TriggerKind, now_ms: f64) -> bool {
        if matches!(kind, TriggerKind::Random) {
            return true;
        }
        if point.is_filled {
            return false;
        }
        point
            .last_triggered_ms
            .map_or(true, |last| now_ms - last >= self.config.retrigger_guard_ms)
    }

    fn volume_hint(&self, kind: &TriggerKind) -> f64 {
        match *kind {
            TriggerKind::Hover => 1.0,
            TriggerKind::Intersection { radius, max_radius } => {
                tone::intersection_volume(radius, max_radius)
            }
            TriggerKind::Random => self.config.random_velocity,
        }
    }

    fn volume_multiplier(&self, track: Track) -> f64 {
        match track {
            Track::Hover => self.config.hover_volume,
            Track::Intersection => self.config.intersection_volume,
            Track::Random => self.config.random_volume,
        }
    }

    /// Sound point `id`. Returns `None` when a guard rejects the trigger.
    pub fn fire(
        &mut self,
        field: &mut PointField,
        id: PointId,
        kind: TriggerKind,
        now_ms: f64,
        tick: u64,
    ) -> Option<SoundCommand> {
        if !self.accepts(field.get(id), &kind, now_ms) {
            log::trace!("[trigger] {:?} rejected for point {}", kind, id);
            return None;
        }

        field.fill(id, tick.saturating_add(self.unfill_ticks));
        field.pulse(id);
        if !matches!(kind, TriggerKind::Random) {
            field.stamp_triggered(id, now_ms);
        }

        let track = kind.track();
        let note = self.advance(track);
        let velocity = tone::velocity(self.volume_hint(&kind), self.volume_multiplier(track));
        log::debug!(
            "[trigger] {} point={} note={} vel={:.3}",
            track,
            id,
            note,
            velocity
        );
        Some(SoundCommand::PlayNote {
            note,
            velocity,
            sampler: track,
            delay_sec: 0.0,
        })
    }

    /// Transpose every track and restart all cursors.
    pub fn reseed(&mut self, semitones: i32) {
        for track in &mut self.tracks {
            track.transpose(semitones);
        }
    }

    /// Restart all cursors and clear the cooldown.
    pub fn reset(&mut self) {
        for track in &mut self.tracks {
            track.reset_cursor();
        }
        self.cooldown.reset();
    }
}
