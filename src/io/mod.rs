// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;

/// Speaker arrangement of one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSet {
    Disabled,
    Mono,
    Stereo,
    Discrete(usize),
}

impl ChannelSet {
    pub fn channels(&self) -> usize {
        match *self {
            ChannelSet::Disabled => 0,
            ChannelSet::Mono => 1,
            ChannelSet::Stereo => 2,
            ChannelSet::Discrete(n) => n,
        }
    }
}

/// Main input/output bus configuration proposed by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusLayout {
    /// `None` when the plugin is configured without an input bus.
    pub input: Option<ChannelSet>,
    pub output: ChannelSet,
}

impl BusLayout {
    pub fn output_only(output: ChannelSet) -> Self {
        Self {
            input: None,
            output,
        }
    }
}

/// Planar multi-channel audio block.
///
/// Storage for `channels × capacity` samples is reserved once; `set_num_samples`
/// only changes the visible length, so resizing per callback never allocates.
#[derive(Debug, Clone, Default)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    num_samples: usize,
}

impl AudioBuffer {
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self {
            channels: vec![vec![0.0; capacity]; num_channels],
            num_samples: capacity,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn capacity(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Set the visible length, clamped to capacity.
    pub fn set_num_samples(&mut self, num_samples: usize) {
        self.num_samples = num_samples.min(self.capacity());
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index][..self.num_samples]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        let len = self.num_samples;
        &mut self.channels[index][..len]
    }

    /// Add one mono sample to every channel at `index`.
    #[inline]
    pub fn add_to_all(&mut self, index: usize, value: f32) {
        for channel in &mut self.channels {
            channel[index] += value;
        }
    }

    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
    }

    /// Interleave the visible samples into `out` (frames × channels).
    pub fn write_interleaved(&self, out: &mut [f32]) {
        let channels = self.num_channels().max(1);
        for (frame, chunk) in out.chunks_mut(channels).take(self.num_samples).enumerate() {
            for (ch, slot) in chunk.iter_mut().enumerate() {
                *slot = self.channels.get(ch).map_or(0.0, |c| c[frame]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_length_is_clamped_to_capacity() {
        let mut buffer = AudioBuffer::new(2, 64);
        buffer.set_num_samples(32);
        assert_eq!(buffer.channel(0).len(), 32);
        buffer.set_num_samples(1_000);
        assert_eq!(buffer.num_samples(), 64);
    }

    #[test]
    fn add_to_all_hits_every_channel() {
        let mut buffer = AudioBuffer::new(2, 4);
        buffer.add_to_all(1, 0.5);
        buffer.add_to_all(1, 0.25);
        assert_eq!(buffer.channel(0), &[0.0, 0.75, 0.0, 0.0]);
        assert_eq!(buffer.channel(1), &[0.0, 0.75, 0.0, 0.0]);
    }

    #[test]
    fn interleaves_frames() {
        let mut buffer = AudioBuffer::new(2, 3);
        buffer.channel_mut(0).copy_from_slice(&[1.0, 2.0, 3.0]);
        buffer.channel_mut(1).copy_from_slice(&[-1.0, -2.0, -3.0]);
        let mut out = [0.0f32; 6];
        buffer.write_interleaved(&mut out);
        assert_eq!(out, [1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
    }
}
