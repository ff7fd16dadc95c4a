use flower_core::SoundCommand;
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsValue;

fn set(obj: &Object, key: &str, value: JsValue) -> Result<(), JsValue> {
    Reflect::set(obj, &JsValue::from_str(key), &value).map(|_| ())
}

/// Plain JS object for one command, tagged by `kind`:
///
/// - `{ kind: "note", note, midi, hz, velocity, sampler, delay }`
/// - `{ kind: "tone", hz, beats }`
/// - `{ kind: "pop", volume, gainDb, rate }`
pub fn command_to_js(cmd: &SoundCommand) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    match *cmd {
        SoundCommand::PlayNote {
            note,
            velocity,
            sampler,
            delay_sec,
        } => {
            set(&obj, "kind", "note".into())?;
            set(&obj, "note", note.to_string().into())?;
            set(&obj, "midi", note.midi().into())?;
            set(&obj, "hz", note.hz().into())?;
            set(&obj, "velocity", velocity.into())?;
            set(&obj, "sampler", sampler.name().into())?;
            set(&obj, "delay", delay_sec.into())?;
        }
        SoundCommand::PlayTransientTone {
            frequency_hz,
            duration_beats,
        } => {
            set(&obj, "kind", "tone".into())?;
            set(&obj, "hz", frequency_hz.into())?;
            set(&obj, "beats", duration_beats.into())?;
        }
        SoundCommand::PlayPop {
            volume,
            gain_db,
            playback_rate,
        } => {
            set(&obj, "kind", "pop".into())?;
            set(&obj, "volume", volume.into())?;
            set(&obj, "gainDb", gain_db.into())?;
            set(&obj, "rate", playback_rate.into())?;
        }
    }
    Ok(obj.into())
}

/// Convert and drain the buffered commands, oldest first.
pub fn drain_to_array(commands: &mut Vec<SoundCommand>) -> Result<Array, JsValue> {
    let array = Array::new();
    for cmd in commands.drain(..) {
        array.push(&command_to_js(&cmd)?);
    }
    Ok(array)
}
