//! Low-level DSP primitives used by the voices.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the
//! signal-processing math; parameter handling and note logic live in `synth`.

/// Flush-to-zero helper for recursive filter state.
pub mod denormal;
/// Per-voice low-pass biquad and cutoff mapping.
pub mod filter;
/// Pulse oscillator composed from two phase-locked saw cores.
pub mod pulse;
/// Feedback-FM anti-aliased sawtooth core.
pub mod saw;

pub use filter::{BiquadCoefficients, LowPass};
pub use pulse::PulseOscillator;
pub use saw::SawCore;
