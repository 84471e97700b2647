//! Host-facing processor: the realtime entry point plus lifecycle hooks.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    config::{ConfigError, ProcessorConfig},
    io::{midi::MidiBuffer, AudioBuffer, BusLayout, ChannelSet},
    params::ParameterStore,
    state::{PluginState, StateError},
    synth::{keyboard_channel, KeyboardQueue, KeyboardState, VoiceBank},
};

pub const PLUGIN_NAME: &str = "Pulse Synth";

/// Owns the voice bank, the shared parameters and the keyboard bridge.
///
/// `process` is the only method meant for the audio thread; everything else
/// runs on the control thread.
pub struct Processor {
    params: Arc<ParameterStore>,
    bank: VoiceBank,
    keyboard: KeyboardQueue,
    config: ProcessorConfig,
    last_sample_rate: f32,
    max_block_size: usize,
}

impl Processor {
    /// Build a processor and the keyboard that feeds it.
    pub fn new(config: ProcessorConfig) -> Result<(Self, KeyboardState), ConfigError> {
        config.validate()?;

        let (keyboard_state, keyboard_queue) = keyboard_channel(config.keyboard_queue_capacity);
        let processor = Self {
            params: Arc::new(ParameterStore::new()),
            bank: VoiceBank::new(config.polyphony),
            keyboard: keyboard_queue,
            config,
            last_sample_rate: 0.0,
            max_block_size: config.max_block_size,
        };

        debug!(polyphony = config.polyphony, "processor created");
        Ok((processor, keyboard_state))
    }

    /// Shared handle for editors and automation.
    pub fn params(&self) -> Arc<ParameterStore> {
        Arc::clone(&self.params)
    }

    /// `max_block_size` is capped at the configured maximum.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        info!(sample_rate, max_block_size, "prepare");
        if sample_rate <= 0.0 {
            warn!(sample_rate, "invalid sample rate, output will be silent");
        }
        if max_block_size > self.config.max_block_size {
            warn!(
                max_block_size,
                limit = self.config.max_block_size,
                "host block size exceeds configured maximum"
            );
        }

        self.last_sample_rate = sample_rate;
        self.max_block_size = max_block_size.clamp(1, self.config.max_block_size);
        self.bank.set_sample_rate(sample_rate);
    }

    pub fn release(&mut self) {
        debug!("release");
        self.bank.all_notes_off();
    }

    pub fn supports_layout(&self, layout: &BusLayout) -> bool {
        if !matches!(layout.output, ChannelSet::Mono | ChannelSet::Stereo) {
            return false;
        }

        match layout.input {
            Some(input) => input == layout.output,
            None => true,
        }
    }

    /// Render one block. Consumes every event in `midi`.
    ///
    /// Keyboard events stay queued until the processor has a valid sample
    /// rate, so the keyboard's held-key map never diverges from the voices.
    pub fn process(&mut self, buffer: &mut AudioBuffer, midi: &mut MidiBuffer) {
        if self.last_sample_rate <= 0.0 {
            buffer.clear();
            midi.clear();
            return;
        }

        self.keyboard.drain_into(midi);

        buffer.clear();
        self.bank.dispatch(midi, buffer, &self.params);
        midi.clear();
    }

    pub fn get_state(&self) -> Vec<u8> {
        PluginState::capture(&self.params).to_bytes()
    }

    /// Restore parameters from a blob produced by [`Processor::get_state`].
    /// On error the current values are left untouched.
    pub fn set_state(&self, bytes: &[u8]) -> Result<(), StateError> {
        match PluginState::from_bytes(bytes) {
            Ok(state) => {
                state.apply(&self.params);
                debug!(?state, "state restored");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "ignoring state blob");
                Err(err)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn accepts_midi(&self) -> bool {
        true
    }

    pub fn produces_midi(&self) -> bool {
        false
    }

    pub fn tail_length_seconds(&self) -> f64 {
        0.0
    }

    pub fn sample_rate(&self) -> f32 {
        self.last_sample_rate
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn voices(&self) -> &VoiceBank {
        &self.bank
    }
}

impl Drop for Processor {
    fn drop(&mut self) {
        self.bank.all_notes_off();
    }
}
