use crate::{
    dsp::{filter::LowPass, pulse::PulseOscillator},
    io::{converter::midi_note_to_freq, AudioBuffer},
    params::ParameterStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,   // Available for allocation
    Active, // Playing; there is no release phase
}

/// One note: pulse oscillator into a low-pass, scaled by velocity and gain.
///
/// Voices are preallocated by the bank and never dropped while the processor
/// lives. Parameters are read from the shared store once per rendered block.
#[derive(Debug, Clone)]
pub struct Voice {
    note: u8,
    velocity: f32,
    state: VoiceState,
    started_at: u64,
    frequency_hz: f32,
    sample_rate: f32,
    osc: PulseOscillator,
    filter: LowPass,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            note: 0,
            velocity: 0.0,
            state: VoiceState::Free,
            started_at: 0,
            frequency_hz: 0.0,
            sample_rate: 0.0,
            osc: PulseOscillator::new(),
            filter: LowPass::new(),
        }
    }

    /// Cache the sample rate. A different rate silences the voice and clears
    /// all DSP state.
    pub fn prepare(&mut self, sample_rate: f32) {
        if sample_rate != self.sample_rate {
            self.free();
            self.filter.reset();
        }
        self.sample_rate = sample_rate;
    }

    /// Every voice plays the single built-in sound on any note and channel.
    pub fn can_play(&self, _note: u8) -> bool {
        true
    }

    /// Start `note` at normalized `velocity`. With no valid sample rate the
    /// voice stays free.
    pub fn start_note(&mut self, note: u8, velocity: f32, stamp: u64, params: &ParameterStore) {
        if self.sample_rate <= 0.0 {
            self.free();
            return;
        }

        self.note = note;
        self.velocity = velocity.clamp(0.0, 1.0);
        self.started_at = stamp;
        self.frequency_hz = midi_note_to_freq(note);

        self.osc.reset();
        self.osc.set_pulse_width(params.pulse_width());
        self.osc.set_frequency(self.frequency_hz, self.sample_rate);

        self.filter.reset();
        self.filter.set_control(params.filter_control(), self.sample_rate);

        self.state = VoiceState::Active;
    }

    /// Hard stop: no tail.
    pub fn stop_note(&mut self) {
        self.free();
    }

    pub fn render_block(
        &mut self,
        out: &mut AudioBuffer,
        start: usize,
        num_samples: usize,
        params: &ParameterStore,
    ) {
        if !self.is_active() || self.sample_rate <= 0.0 {
            return;
        }

        self.osc.set_frequency(self.frequency_hz, self.sample_rate);
        self.osc.set_pulse_width(params.pulse_width());
        self.filter
            .track_control(params.filter_control(), self.sample_rate);
        self.filter.flush_denormals();

        let level = self.velocity * params.gain_linear();

        for index in start..start + num_samples {
            let raw = self.osc.next_sample() * level;
            let value = self.filter.process(raw);
            out.add_to_all(index, value);
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        self.state == VoiceState::Active
    }

    /// Return to the pool: inactive, zero velocity, oscillator cleared.
    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.velocity = 0.0;
        self.osc.reset();
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Allocation stamp; larger is more recent.
    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn oscillator(&self) -> &PulseOscillator {
        &self.osc
    }

    pub fn filter(&self) -> &LowPass {
        &self.filter
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}
