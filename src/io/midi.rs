/// Channel voice messages the synth understands.
///
/// Channels are 0-based (0..=15); keys and velocities are 7-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

/// Controller numbers with channel-mode meaning.
pub const CC_ALL_SOUND_OFF: u8 = 120;
pub const CC_ALL_NOTES_OFF: u8 = 123;

impl MidiEvent {
    /// Parse a raw 2–3 byte channel message. System messages and truncated
    /// input yield `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let status = *bytes.first()?;
        let channel = status & 0x0F;
        let data = |i: usize| bytes.get(i).map(|b| b & 0x7F);

        match status & 0xF0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data(1)?,
                velocity: data(2)?,
            }),
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                key: data(1)?,
                velocity: data(2)?,
            }),
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data(1)?,
                value: data(2)?,
            }),
            0xC0 => Some(MidiEvent::ProgramChange {
                channel,
                program: data(1)?,
            }),
            0xE0 => {
                let lsb = data(1)? as i16;
                let msb = data(2)? as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: ((msb << 7) | lsb) - 8192,
                })
            }
            _ => None,
        }
    }
}

/// A MIDI event positioned at a sample offset within the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedMidiEvent {
    pub offset: usize,
    pub event: MidiEvent,
}

/// Block-scoped event list, kept sorted by offset.
///
/// Storage is reserved up front; once full, further pushes are dropped rather
/// than reallocating on the audio thread.
#[derive(Debug, Clone)]
pub struct MidiBuffer {
    events: Vec<TimedMidiEvent>,
}

pub const DEFAULT_MIDI_CAPACITY: usize = 512;

impl MidiBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MIDI_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity.max(1)),
        }
    }

    /// Insert after any events with an offset `<= offset`, so events sharing
    /// a timestamp keep their arrival order. Returns `false` when full.
    pub fn push(&mut self, offset: usize, event: MidiEvent) -> bool {
        if self.events.len() == self.events.capacity() {
            return false;
        }

        let index = self.events.partition_point(|e| e.offset <= offset);
        self.events.insert(index, TimedMidiEvent { offset, event });
        true
    }

    /// Insert ahead of every existing event at `offset`.
    pub fn push_front_at(&mut self, offset: usize, event: MidiEvent) -> bool {
        if self.events.len() == self.events.capacity() {
            return false;
        }

        let index = self.events.partition_point(|e| e.offset < offset);
        self.events.insert(index, TimedMidiEvent { offset, event });
        true
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedMidiEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[TimedMidiEvent] {
        &self.events
    }
}

impl Default for MidiBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a MidiBuffer {
    type Item = &'a TimedMidiEvent;
    type IntoIter = std::slice::Iter<'a, TimedMidiEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_on(key: u8) -> MidiEvent {
        MidiEvent::NoteOn {
            channel: 0,
            key,
            velocity: 100,
        }
    }

    #[test]
    fn parses_channel_messages() {
        assert_eq!(
            MidiEvent::from_bytes(&[0x93, 60, 127]),
            Some(MidiEvent::NoteOn {
                channel: 3,
                key: 60,
                velocity: 127
            })
        );
        assert_eq!(
            MidiEvent::from_bytes(&[0x80, 60, 0]),
            Some(MidiEvent::NoteOff {
                channel: 0,
                key: 60,
                velocity: 0
            })
        );
        assert_eq!(
            MidiEvent::from_bytes(&[0xB0, 123, 0]),
            Some(MidiEvent::ControlChange {
                channel: 0,
                controller: CC_ALL_NOTES_OFF,
                value: 0
            })
        );
        assert_eq!(
            MidiEvent::from_bytes(&[0xE0, 0x00, 0x40]),
            Some(MidiEvent::PitchBend {
                channel: 0,
                value: 0
            })
        );
    }

    #[test]
    fn rejects_truncated_and_system_messages() {
        assert_eq!(MidiEvent::from_bytes(&[]), None);
        assert_eq!(MidiEvent::from_bytes(&[0x90, 60]), None);
        assert_eq!(MidiEvent::from_bytes(&[0xF8]), None);
    }

    #[test]
    fn push_keeps_offsets_monotonic_and_stable() {
        let mut buffer = MidiBuffer::with_capacity(8);
        buffer.push(10, note_on(1));
        buffer.push(0, note_on(2));
        buffer.push(10, note_on(3));
        buffer.push(5, note_on(4));

        let keys: Vec<u8> = buffer
            .iter()
            .map(|e| match e.event {
                MidiEvent::NoteOn { key, .. } => key,
                _ => 0,
            })
            .collect();
        assert_eq!(keys, vec![2, 4, 1, 3]);
    }

    #[test]
    fn push_front_at_precedes_same_offset() {
        let mut buffer = MidiBuffer::with_capacity(4);
        buffer.push(0, note_on(1));
        buffer.push_front_at(0, note_on(2));
        assert_eq!(buffer.as_slice()[0].event, note_on(2));
    }

    #[test]
    fn full_buffer_drops_without_growing() {
        let mut buffer = MidiBuffer::with_capacity(2);
        let capacity = buffer.capacity();
        for i in 0..capacity {
            assert!(buffer.push(i, note_on(i as u8)));
        }
        assert!(!buffer.push(0, note_on(99)));
        assert_eq!(buffer.capacity(), capacity);
    }
}
