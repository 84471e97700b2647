// Purpose: Voice management, polyphony, MIDI handling
// This layer sits above the DSP primitives and manages multiple voices

pub mod bank;
pub mod keyboard;
pub mod message;
pub mod voice;

pub use bank::{VoiceBank, DEFAULT_POLYPHONY};
pub use keyboard::{keyboard_channel, KeyboardQueue, KeyboardState};
pub use message::SynthMessage;
pub use voice::{Voice, VoiceState};
