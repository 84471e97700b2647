use std::f32::consts::PI;

use super::denormal::flush;

/*
| control | cutoff                   | character          |
| ------- | ------------------------ | ------------------ |
| 0.0     | 0.45 × sample rate       | open, transparent  |
| 0.5     | midway (linear in Hz)    | softened edges     |
| 1.0     | 200 Hz                   | closed, muffled    |
*/

pub const MIN_CUTOFF_HZ: f32 = 200.0;
pub const MAX_CUTOFF_RATIO: f32 = 0.45;
/// Smallest control movement that triggers a coefficient update.
pub const CONTROL_EPSILON: f32 = 1.0e-3;

const BUTTERWORTH_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Normalized second-order low-pass coefficients (a0 = 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Pass-through: output equals input.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Bilinear-transform Butterworth low-pass.
    ///
    /// `cutoff_hz` is clamped below Nyquist so the prewarp stays finite.
    pub fn low_pass(sample_rate: f32, cutoff_hz: f32) -> Self {
        if sample_rate <= 0.0 {
            return Self::IDENTITY;
        }

        let cutoff = cutoff_hz.clamp(1.0, sample_rate * 0.499);
        let n = 1.0 / (PI * cutoff / sample_rate).tan();
        let n_squared = n * n;
        let inv_q = 1.0 / BUTTERWORTH_Q;
        let c1 = 1.0 / (1.0 + inv_q * n + n_squared);

        Self {
            b0: c1,
            b1: c1 * 2.0,
            b2: c1,
            a1: c1 * 2.0 * (1.0 - n_squared),
            a2: c1 * (1.0 - inv_q * n + n_squared),
        }
    }
}

/// Map the virtual filter control onto a cutoff frequency.
///
/// Linear in Hz between `0.45 * sample_rate` (control 0) and 200 Hz (control 1).
#[inline]
pub fn control_to_cutoff(control: f32, sample_rate: f32) -> f32 {
    let control = control.clamp(0.0, 1.0);
    let max_hz = sample_rate * MAX_CUTOFF_RATIO;
    max_hz + control * (MIN_CUTOFF_HZ - max_hz)
}

/// Per-voice low-pass biquad driven by the virtual filter control.
///
/// Transposed direct form II: two state words, one multiply-add chain.
#[derive(Debug, Clone, Copy)]
pub struct LowPass {
    coefficients: BiquadCoefficients,
    v1: f32,
    v2: f32,
    last_control: Option<f32>,
}

impl LowPass {
    pub fn new() -> Self {
        Self {
            coefficients: BiquadCoefficients::IDENTITY,
            v1: 0.0,
            v2: 0.0,
            last_control: None,
        }
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coefficients
    }

    /// Recompute coefficients for `control` unconditionally.
    pub fn set_control(&mut self, control: f32, sample_rate: f32) {
        self.last_control = Some(control);
        self.coefficients = BiquadCoefficients::low_pass(sample_rate, control_to_cutoff(control, sample_rate));
    }

    /// Recompute only if `control` moved more than [`CONTROL_EPSILON`] since
    /// the last update. Returns whether coefficients changed.
    pub fn track_control(&mut self, control: f32, sample_rate: f32) -> bool {
        match self.last_control {
            Some(last) if (control - last).abs() <= CONTROL_EPSILON => false,
            _ => {
                self.set_control(control, sample_rate);
                true
            }
        }
    }

    pub fn last_control(&self) -> Option<f32> {
        self.last_control
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coefficients;
        let output = c.b0 * input + self.v1;
        self.v1 = c.b1 * input - c.a1 * output + self.v2;
        self.v2 = c.b2 * input - c.a2 * output;
        output
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Zero any state word that has decayed into the denormal range.
    pub fn flush_denormals(&mut self) {
        self.v1 = flush(self.v1);
        self.v2 = flush(self.v2);
    }

    /// Zero the delay line. Coefficients are kept.
    pub fn reset(&mut self) {
        self.v1 = 0.0;
        self.v2 = 0.0;
    }

    pub fn is_cleared(&self) -> bool {
        self.v1 == 0.0 && self.v2 == 0.0
    }
}

impl Default for LowPass {
    fn default() -> Self {
        Self::new()
    }
}
