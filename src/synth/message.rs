use rtrb::{Consumer, Producer};

use crate::io::midi::MidiEvent;

/// Note-level commands consumed by the voice bank.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    /// `velocity` is normalized to 0.0..=1.0.
    NoteOn { note: u8, velocity: f32 },
    NoteOff { note: u8 },
    AllNotesOff,
}

/// Source of MIDI events drained on the audio thread.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<MidiEvent>;
}

/// Sink of MIDI events filled from the control thread.
pub trait MessageSender {
    /// Returns `false` when the queue is full and the event was dropped.
    fn push(&mut self, event: MidiEvent) -> bool;
}

impl MessageReceiver for Consumer<MidiEvent> {
    fn pop(&mut self) -> Option<MidiEvent> {
        Consumer::pop(self).ok()
    }
}

impl MessageSender for Producer<MidiEvent> {
    fn push(&mut self, event: MidiEvent) -> bool {
        Producer::push(self, event).is_ok()
    }
}
