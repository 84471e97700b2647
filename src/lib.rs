pub mod config;
pub mod dsp; // Oscillators and filters
pub mod io;
pub mod params; // Shared lock-free controls
pub mod processor;
pub mod state;
pub mod synth; // Voice management and polyphony

pub use config::{ConfigError, ProcessorConfig};
pub use params::{ParamId, ParameterStore};
pub use processor::Processor;

pub const MAX_BLOCK_SIZE: usize = 2048;
