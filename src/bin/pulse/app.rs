//! Audio device setup and the realtime callback

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracing::{error, info};

use pulse_synth::{
    io::{midi::MidiBuffer, AudioBuffer, BusLayout, ChannelSet},
    synth::KeyboardState,
    Processor, ProcessorConfig,
};

use super::ui::{UiApp, UiInit};

/// Samples of scope history the UI can lag behind by before new ones are dropped.
const SCOPE_RING_SIZE: usize = 16_384;

/// Owns the processor until `run` hands it to the audio stream.
pub struct PulseApp {
    processor: Processor,
    keyboard: KeyboardState,
}

impl PulseApp {
    pub fn new(config: ProcessorConfig) -> EyreResult<Self> {
        let (processor, keyboard) =
            Processor::new(config).wrap_err("invalid processor configuration")?;
        Ok(Self {
            processor,
            keyboard,
        })
    }

    /// Open the default output device, start the stream and run the UI until quit.
    pub fn run(self) -> EyreResult<()> {
        let Self {
            mut processor,
            keyboard,
        } = self;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let layout = match channels {
            1 => BusLayout::output_only(ChannelSet::Mono),
            2 => BusLayout::output_only(ChannelSet::Stereo),
            n => BusLayout::output_only(ChannelSet::Discrete(n)),
        };
        if !processor.supports_layout(&layout) {
            return Err(eyre!("output device has {channels} channels, need mono or stereo"));
        }

        let block_size = processor.config().max_block_size;
        info!(device = ?device.name().ok(), sample_rate, channels, block_size, "opening output");
        processor.prepare(sample_rate, block_size);

        let params = processor.params();
        let polyphony = processor.voices().polyphony();
        let active_voices = Arc::new(AtomicUsize::new(0));
        let voices_out = Arc::clone(&active_voices);
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);

        let mut buffer = AudioBuffer::new(channels, block_size);
        let mut midi = MidiBuffer::new();

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(block_size);
                    buffer.set_num_samples(frames);
                    processor.process(&mut buffer, &mut midi);

                    let start = frames_written * channels;
                    buffer.write_interleaved(&mut data[start..start + frames * channels]);

                    // Scope is best-effort; a full ring just drops samples.
                    for &sample in buffer.channel(0) {
                        if scope_tx.push(sample).is_err() {
                            break;
                        }
                    }

                    frames_written += frames;
                }

                voices_out.store(processor.voices().active_voice_count(), Ordering::Relaxed);
            },
            |err| error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;

        let init = UiInit {
            sample_rate,
            channels,
            polyphony,
        };

        let mut terminal = ratatui::init();
        let result = UiApp::new(scope_rx, params, keyboard, active_voices, init).run(&mut terminal);
        ratatui::restore();

        drop(stream);
        info!("stopped");
        result
    }
}
