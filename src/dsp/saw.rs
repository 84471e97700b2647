use std::f32::consts::TAU;

/*
Feedback-FM Sawtooth
====================

A naive sawtooth (`phase * 2 - 1`) has a hard discontinuity once per period.
That edge contains energy at every harmonic, and every harmonic above Nyquist
folds back into the audible band as inharmonic aliasing.

This core takes a different route: start from a smooth kernel (a sine) and let
it modulate its own phase. The more feedback, the more the sine leans into a
ramp shape and the more harmonics it carries.

    feedback_phase = phase + osc * beta
    input          = sin(2π * feedback_phase)
    osc            = ½ (osc + input)          one-pole smoother on the loop

The feedback gain `beta` is tied to pitch:

    w    = f / sample_rate                  (cycles per sample, ≤ 0.49)
    beta = 13 * (0.5 - w)^4

Low notes get strong feedback and a bright, harmonically rich edge. As the
fundamental approaches Nyquist, `beta` collapses to zero and the output
degrades toward a plain sine, which has nothing left to alias.

Post-processing:
  - `2.5 * osc - 1.5 * prev` is a two-tap FIR that lifts the highs the
    smoother rolled off.
  - `dc = 0.376 - 0.752 * w` removes the offset the feedback bias introduces.
  - `norm = max(0.001, 1 - 2w)` restores peak level as the period shrinks. The
    floor keeps the division finite as w approaches 0.5.
*/

const HF_COMP_A0: f32 = 2.5;
const HF_COMP_A1: f32 = -1.5;
const MIN_NORM: f32 = 0.001;
const MAX_W: f32 = 0.49;

/// Single-sample band-limited sawtooth generator.
///
/// Allocation-free and `Copy`, so it can be embedded directly inside voices.
#[derive(Debug, Clone, Copy, Default)]
pub struct SawCore {
    phase: f32,
    osc: f32,
    previous_input: f32,
    w: f32,
    beta: f32,
}

impl SawCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fundamental. Ignored when `sample_rate` is not positive.
    pub fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        if sample_rate <= 0.0 {
            return;
        }

        self.w = (frequency / sample_rate).clamp(0.0, MAX_W);
        let diff = 0.5 - self.w;
        self.beta = 13.0 * diff * diff * diff * diff;
    }

    /// Zero the running state. Frequency (`w`, `beta`) is kept.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.osc = 0.0;
        self.previous_input = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.next_sample_at(self.phase)
    }

    /// Run one step of the saw using `phase` as the current position, then
    /// advance the stored phase from there.
    ///
    /// This is what lets a second core be slaved to another core's phase.
    #[inline]
    pub fn next_sample_at(&mut self, phase: f32) -> f32 {
        let feedback_phase = phase + self.osc * self.beta;
        let input = (TAU * feedback_phase).sin();
        self.osc = 0.5 * (self.osc + input);

        let filtered = HF_COMP_A0 * self.osc + HF_COMP_A1 * self.previous_input;
        self.previous_input = self.osc;

        let dc = 0.376 - 0.752 * self.w;
        let norm = (1.0 - 2.0 * self.w).max(MIN_NORM);
        let sample = (filtered - dc) / norm;

        self.phase = phase + self.w;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Normalized frequency in cycles per sample.
    pub fn w(&self) -> f32 {
        self.w
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }

    /// True when every running state variable is zero.
    pub fn is_cleared(&self) -> bool {
        self.phase == 0.0 && self.osc == 0.0 && self.previous_input == 0.0
    }
}
