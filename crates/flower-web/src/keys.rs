//! Page key bindings. Plain Rust so host-side tests can reach them.

/// What a key press asks the simulation to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Reseed,
    Reset,
    TogglePause,
}

/// Map a `KeyboardEvent.key` value to an action.
#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "r" | "R" => Some(KeyAction::Reseed),
        "c" | "C" | "Escape" => Some(KeyAction::Reset),
        " " => Some(KeyAction::TogglePause),
        _ => None,
    }
}

/// Random transposition within a fifth either way, from a uniform sample in
/// `[0, 1)` such as `Math.random()`.
#[inline]
pub fn reseed_semitones(unit: f64) -> i32 {
    let unit = if unit.is_finite() {
        unit.clamp(0.0, 1.0)
    } else {
        0.5
    };
    ((unit * 15.0).floor() as i32 - 7).min(7)
}
