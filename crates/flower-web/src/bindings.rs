use crate::commands;
use crate::keys::{action_for_key, reseed_semitones, KeyAction};
use flower_core::constants::CONNECTION_STRIDE;
use flower_core::{
    connections, point_instances, site_instances, wave_instances, FlowerConfig, Metronome,
    PointerEvent, Simulation, SoundCommand,
};
use glam::DVec2;
use std::time::Duration;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("flower-web starting");
    Ok(())
}

fn js_err(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

#[wasm_bindgen]
pub struct FlowerSim {
    sim: Simulation,
    metronome: Metronome,
    commands: Vec<SoundCommand>,
    last_ms: Option<f64>,
    pixel_ratio: f64,
    paused: bool,
}

impl FlowerSim {
    fn build(width: f64, height: f64, seed: u64, pixel_ratio: f64) -> anyhow::Result<Self> {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let config = FlowerConfig::centered(width * pixel_ratio, height * pixel_ratio);
        let bpm = config.music.bpm;
        let sim = Simulation::new(config, seed)
            .map_err(|e| anyhow::anyhow!("invalid flower config: {e}"))?;
        log::info!(
            "[web] {}x{} @{} points={} bpm={}",
            width,
            height,
            pixel_ratio,
            sim.points().len(),
            bpm
        );
        Ok(Self {
            sim,
            metronome: Metronome::new(bpm),
            commands: Vec::new(),
            last_ms: None,
            pixel_ratio,
            paused: false,
        })
    }

    fn to_local(&self, x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y) * self.pixel_ratio
    }
}

#[wasm_bindgen]
impl FlowerSim {
    /// Flower centered in a `width` x `height` canvas (CSS pixels).
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, seed: f64, pixel_ratio: f64) -> Result<FlowerSim, JsValue> {
        Self::build(width, height, seed as u64, pixel_ratio).map_err(js_err)
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        let p = self.to_local(x, y);
        if let Some(id) = self
            .sim
            .pointer(PointerEvent::Down { x: p.x, y: p.y }, &mut self.commands)
        {
            log::debug!("[wave] spawned {:?} at ({:.1}, {:.1})", id, p.x, p.y);
        }
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let p = self.to_local(x, y);
        self.sim
            .pointer(PointerEvent::Move { x: p.x, y: p.y }, &mut self.commands);
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.sim.pointer(PointerEvent::Up, &mut self.commands);
    }

    /// Handle a `KeyboardEvent.key`. Returns `true` when the page should
    /// suppress the default action.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        match action_for_key(key) {
            Some(KeyAction::Reseed) => {
                self.reseed_chords(reseed_semitones(js_sys::Math::random()));
                false
            }
            Some(KeyAction::Reset) => {
                self.reset();
                false
            }
            Some(KeyAction::TogglePause) => {
                self.paused = !self.paused;
                log::info!("[web] paused={}", self.paused);
                true
            }
            None => false,
        }
    }

    /// Advance the simulation to host time `now_ms` (from
    /// `requestAnimationFrame`). Ambient beats due since the last frame are
    /// played first.
    pub fn frame(&mut self, now_ms: f64) {
        let dt_ms = self.last_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_ms = Some(now_ms);
        if self.paused {
            return;
        }
        let beats = self.metronome.tick(Duration::from_secs_f64(dt_ms / 1000.0));
        for _ in 0..beats {
            self.sim.beat(&mut self.commands);
        }
        self.sim.advance(now_ms, &mut self.commands);
    }

    /// Sound commands produced since the last call, as plain JS objects.
    #[wasm_bindgen(js_name = drainCommands)]
    pub fn drain_commands(&mut self) -> Result<js_sys::Array, JsValue> {
        commands::drain_to_array(&mut self.commands)
    }

    /// `[x, y, radius, filled]` per point.
    #[wasm_bindgen(js_name = pointBuffer)]
    pub fn point_buffer(&self) -> js_sys::Float32Array {
        let instances = point_instances(self.sim.points());
        js_sys::Float32Array::from(bytemuck::cast_slice::<_, f32>(&instances))
    }

    /// `[x, y, radius, opacity]` per live wave.
    #[wasm_bindgen(js_name = waveBuffer)]
    pub fn wave_buffer(&self) -> js_sys::Float32Array {
        let instances = wave_instances(self.sim.waves());
        js_sys::Float32Array::from(bytemuck::cast_slice::<_, f32>(&instances))
    }

    /// `[x, y, radius, opacity]` per intersection glow.
    #[wasm_bindgen(js_name = intersectionBuffer)]
    pub fn intersection_buffer(&self) -> js_sys::Float32Array {
        let instances = site_instances(self.sim.intersection_sites());
        js_sys::Float32Array::from(bytemuck::cast_slice::<_, f32>(&instances))
    }

    /// Flattened `[from, to]` index pairs for the connective lines.
    #[wasm_bindgen(js_name = connectionIndices)]
    pub fn connection_indices(&self) -> js_sys::Uint32Array {
        let indices: Vec<u32> = connections(self.sim.points().len(), CONNECTION_STRIDE)
            .flat_map(|(a, b)| [a as u32, b as u32])
            .collect();
        js_sys::Uint32Array::from(indices.as_slice())
    }

    #[wasm_bindgen(js_name = droneFrequency)]
    pub fn drone_frequency(&self) -> f64 {
        self.sim.drone().frequency_hz
    }

    #[wasm_bindgen(js_name = droneVolumeDb)]
    pub fn drone_volume_db(&self) -> f64 {
        self.sim.drone().volume_db
    }

    #[wasm_bindgen(js_name = reseedChords)]
    pub fn reseed_chords(&mut self, semitones: i32) {
        self.sim.reseed_chords(semitones);
    }

    pub fn reset(&mut self) {
        self.sim.reset();
        self.metronome.reset();
        self.commands.clear();
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn tick(&self) -> f64 {
        self.sim.tick() as f64
    }
}
