//! Band-limited pulse built from two sawtooth edges.

use super::saw::SawCore;

/*
Pulse from Two Saws
===================

Subtract a sawtooth from a copy of itself shifted by `pw` of a period and the
ramps cancel, leaving two flat levels with one edge from each saw:

    leading:   /|  /|  /|
    trailing:   /|  /|  /|      (shifted by pw)
    L - T:     ‾|_‾|_‾|_        duty cycle set by pw

Because each edge comes from an anti-aliased saw, the pulse inherits the same
band limiting. Both cores always share `w` and `beta`.

The trailing core never advances on its own. Every sample its phase is taken
from the leading core plus `pw`, so the offset stays locked when the pulse
width moves between samples.
*/

const MIN_PULSE_WIDTH: f32 = 0.01;
const MAX_PULSE_WIDTH: f32 = 0.99;

#[derive(Debug, Clone, Copy)]
pub struct PulseOscillator {
    leading: SawCore,
    trailing: SawCore,
    pulse_width: f32,
}

impl PulseOscillator {
    pub fn new() -> Self {
        Self {
            leading: SawCore::new(),
            trailing: SawCore::new(),
            pulse_width: 0.5,
        }
    }

    pub fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        self.leading.set_frequency(frequency, sample_rate);
        self.trailing.set_frequency(frequency, sample_rate);
    }

    pub fn set_pulse_width(&mut self, pulse_width: f32) {
        self.pulse_width = pulse_width.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH);
    }

    pub fn pulse_width(&self) -> f32 {
        self.pulse_width
    }

    pub fn reset(&mut self) {
        self.leading.reset();
        self.trailing.reset();
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let leading = self.leading.next_sample();

        let mut shifted = self.leading.phase() + self.pulse_width;
        while shifted >= 1.0 {
            shifted -= 1.0;
        }

        let trailing = self.trailing.next_sample_at(shifted);

        (leading - trailing).clamp(-1.0, 1.0)
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn leading(&self) -> &SawCore {
        &self.leading
    }

    pub fn trailing(&self) -> &SawCore {
        &self.trailing
    }

    pub fn is_cleared(&self) -> bool {
        self.leading.is_cleared() && self.trailing.is_cleared()
    }
}

impl Default for PulseOscillator {
    fn default() -> Self {
        Self::new()
    }
}
