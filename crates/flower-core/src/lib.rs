pub mod config;
pub mod constants;
pub mod field;
pub mod intersect;
pub mod metronome;
pub mod music;
pub mod sequencer;
pub mod sim;
pub mod sound;
pub mod state;
pub mod tone;
pub mod waves;

pub use config::*;
pub use field::*;
pub use intersect::*;
pub use metronome::*;
pub use music::*;
pub use sequencer::*;
pub use sim::*;
pub use sound::*;
pub use state::*;
pub use waves::*;
