use crate::config::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Note source category. Each track owns its own chord rotation and is
/// routed to its own sampler by the sound engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    Random,
    Hover,
    Intersection,
}

impl Track {
    pub const ALL: [Track; 3] = [Track::Random, Track::Hover, Track::Intersection];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Track::Random => 0,
            Track::Hover => 1,
            Track::Intersection => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Track::Random => "random",
            Track::Hover => "hover",
            Track::Intersection => "intersection",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A pitch as a MIDI note number, written in scientific pitch notation
/// (`C4` = 60, `A4` = 69).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Note(pub i32);

impl Note {
    #[inline]
    pub fn midi(self) -> i32 {
        self.0
    }

    /// Shift by `semitones`, saturating at the ends of the `i32` range.
    #[inline]
    pub fn transpose(self, semitones: i32) -> Note {
        Note(self.0.saturating_add(semitones))
    }

    /// Frequency in Hertz, A4 = 440 Hz.
    pub fn hz(self) -> f64 {
        midi_to_hz(self.0 as f64)
    }

    pub fn octave(self) -> i32 {
        self.0.div_euclid(12) - 1
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pc = self.0.rem_euclid(12) as usize;
        write!(f, "{}{}", SHARP_NAMES[pc], self.octave())
    }
}

impl FromStr for Note {
    type Err = ConfigError;

    /// Parses names like `C2`, `F#3`, `Bb1` or `C-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidNote(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let base = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };
        let rest = chars.as_str();
        let (accidental, octave_str) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };
        let octave: i32 = octave_str.parse().map_err(|_| invalid())?;
        let midi = octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|m| m.checked_add(base + accidental))
            .ok_or_else(invalid)?;
        Ok(Note(midi))
    }
}

/// Parse a table of chord names into notes.
pub fn parse_chords(names: &[&[&str]]) -> Result<Vec<Vec<Note>>, ConfigError> {
    names
        .iter()
        .map(|chord| chord.iter().map(|n| n.parse::<Note>()).collect())
        .collect()
}

// Seventh chords voiced around the second octave
pub const CMAJ7: &[&str] = &["C2", "E2", "G2", "B2"];
pub const AM7: &[&str] = &["A2", "C2", "E2", "G2"];
pub const DM7: &[&str] = &["D2", "F2", "A2", "C2"];
pub const G7: &[&str] = &["G2", "B2", "D2", "F2"];

pub const RANDOM_CHORDS: &[&[&str]] = &[CMAJ7, AM7, DM7, G7];
pub const HOVER_CHORDS: &[&[&str]] = &[AM7, DM7, CMAJ7, G7];
pub const INTERSECTION_CHORDS: &[&[&str]] = &[CMAJ7, AM7, DM7, G7];

/// Cyclic cursor over a fixed rotation of chords.
///
/// `advance` returns the note under the cursor and then steps it: past the
/// last note of a chord the cursor moves to the first note of the next chord,
/// wrapping from the last chord back to the first.
#[derive(Clone, Debug)]
pub struct ChordTrack {
    chords: Vec<Vec<Note>>,
    chord_index: usize,
    note_index: usize,
}

impl ChordTrack {
    /// Fails on an empty table or a table containing an empty chord.
    pub fn new(chords: Vec<Vec<Note>>) -> Result<Self, ConfigError> {
        if chords.is_empty() {
            return Err(ConfigError::EmptyChordTable);
        }
        if chords.iter().any(|c| c.is_empty()) {
            return Err(ConfigError::EmptyChord);
        }
        Ok(Self {
            chords,
            chord_index: 0,
            note_index: 0,
        })
    }

    pub fn from_names(names: &[&[&str]]) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::EmptyChordTable);
        }
        Self::new(parse_chords(names)?)
    }

    pub fn advance(&mut self) -> Note {
        let chord = &self.chords[self.chord_index];
        let note = chord[self.note_index];
        self.note_index += 1;
        if self.note_index == chord.len() {
            self.chord_index = (self.chord_index + 1) % self.chords.len();
            self.note_index = 0;
        }
        note
    }

    /// Current `(chord_index, note_index)`.
    #[inline]
    pub fn cursor(&self) -> (usize, usize) {
        (self.chord_index, self.note_index)
    }

    /// Number of `advance` calls after which the cursor is back at `(0, 0)`.
    pub fn cycle_len(&self) -> usize {
        self.chords.iter().map(Vec::len).sum()
    }

    pub fn chords(&self) -> &[Vec<Note>] {
        &self.chords
    }

    pub fn reset_cursor(&mut self) {
        self.chord_index = 0;
        self.note_index = 0;
    }

    /// Shift every chord by `semitones` and restart at the first note.
    pub fn transpose(&mut self, semitones: i32) {
        for chord in &mut self.chords {
            for note in chord.iter_mut() {
                *note = note.transpose(semitones);
            }
        }
        self.reset_cursor();
    }
}

/// Convert a MIDI note number to Hertz (A4=440 Hz).
///
/// Monotonic and exhibits octave symmetry: +12 semitones doubles the frequency.
pub fn midi_to_hz(midi: f64) -> f64 {
    440.0 * 2.0_f64.powf((midi - 69.0) / 12.0)
}
