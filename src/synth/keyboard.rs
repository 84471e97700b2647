//! Bridge from an on-screen keyboard to the audio thread.
//!
//! The control side ([`KeyboardState`]) tracks which keys are held and pushes
//! note events into a lock-free SPSC ring. The audio side ([`KeyboardQueue`])
//! drains that ring at the top of every block and places the events at offset
//! 0, ahead of host events at the same offset. Events leave the ring only when
//! the block has room for them.

use rtrb::{Consumer, Producer, RingBuffer};

use crate::io::{
    converter::velocity_to_midi,
    midi::{MidiBuffer, MidiEvent},
};
use crate::synth::message::{MessageReceiver, MessageSender};

pub const LOWEST_KEY: u8 = 36;
pub const HIGHEST_KEY: u8 = 96;
pub const DEFAULT_VELOCITY: f32 = 0.8;

/// Create a connected keyboard pair with room for `capacity` pending events.
pub fn keyboard_channel(capacity: usize) -> (KeyboardState, KeyboardQueue) {
    let capacity = capacity.max(1);
    let (tx, rx) = RingBuffer::<MidiEvent>::new(capacity);
    (KeyboardState::new(tx), KeyboardQueue::new(rx, capacity))
}

/// Control-thread keyboard: held-key map plus the event producer.
pub struct KeyboardState {
    tx: Producer<MidiEvent>,
    held: [bool; 128],
    velocity: f32,
    channel: u8,
}

impl KeyboardState {
    fn new(tx: Producer<MidiEvent>) -> Self {
        Self {
            tx,
            held: [false; 128],
            velocity: DEFAULT_VELOCITY,
            channel: 0,
        }
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity.clamp(0.0, 1.0);
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Press `note`. Returns `false` if it was already held, out of MIDI
    /// range, or the queue is full.
    pub fn note_on(&mut self, note: u8) -> bool {
        if note > 127 || self.held[note as usize] {
            return false;
        }

        let event = MidiEvent::NoteOn {
            channel: self.channel,
            key: note,
            velocity: velocity_to_midi(self.velocity).max(1),
        };
        if !MessageSender::push(&mut self.tx, event) {
            return false;
        }

        self.held[note as usize] = true;
        true
    }

    /// Release `note`. Returns `false` if it was not held or the queue is full.
    pub fn note_off(&mut self, note: u8) -> bool {
        if note > 127 || !self.held[note as usize] {
            return false;
        }

        let event = MidiEvent::NoteOff {
            channel: self.channel,
            key: note,
            velocity: 0,
        };
        if !MessageSender::push(&mut self.tx, event) {
            return false;
        }

        self.held[note as usize] = false;
        true
    }

    /// Flip `note` between held and released.
    pub fn toggle(&mut self, note: u8) -> bool {
        if self.is_note_on(note) {
            self.note_off(note)
        } else {
            self.note_on(note)
        }
    }

    /// Release every held key.
    pub fn all_notes_off(&mut self) {
        for note in 0..=127u8 {
            if self.held[note as usize] {
                self.note_off(note);
            }
        }
    }

    pub fn is_note_on(&self, note: u8) -> bool {
        self.held.get(note as usize).copied().unwrap_or(false)
    }

    pub fn held_notes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=127u8).filter(|&n| self.held[n as usize])
    }
}

/// Audio-thread end of the keyboard ring.
pub struct KeyboardQueue {
    rx: Consumer<MidiEvent>,
    scratch: Vec<MidiEvent>,
}

impl KeyboardQueue {
    fn new(rx: Consumer<MidiEvent>, capacity: usize) -> Self {
        Self {
            rx,
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Move pending keyboard events to offset 0 of `midi`, in the order they
    /// were pressed. Returns the number of events merged.
    ///
    /// Only as many events as `midi` has room for leave the ring; the rest
    /// wait for the next block, so no keyboard event is ever dropped here.
    pub fn drain_into(&mut self, midi: &mut MidiBuffer) -> usize {
        let room = midi.capacity().saturating_sub(midi.len());
        let limit = room.min(self.scratch.capacity());

        self.scratch.clear();
        while self.scratch.len() < limit {
            match MessageReceiver::pop(&mut self.rx) {
                Some(event) => self.scratch.push(event),
                None => break,
            }
        }

        let mut merged = 0;
        for &event in self.scratch.iter().rev() {
            if midi.push_front_at(0, event) {
                merged += 1;
            }
        }
        merged
    }
}
