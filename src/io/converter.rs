use crate::{
    io::midi::{MidiEvent, CC_ALL_NOTES_OFF, CC_ALL_SOUND_OFF},
    synth::message::SynthMessage,
};

/// Translate a raw MIDI event into a synth message.
///
/// The synth is omni: every channel is accepted. A note-on with velocity 0 is
/// a note-off. Messages the synth has no use for map to `None`.
pub fn midi_to_synth(midi: MidiEvent) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn { key, velocity, .. } if velocity > 0 => Some(SynthMessage::NoteOn {
            note: key,
            velocity: velocity as f32 / 127.0,
        }),
        MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => {
            Some(SynthMessage::NoteOff { note: key })
        }
        MidiEvent::ControlChange { controller, .. }
            if controller == CC_ALL_NOTES_OFF || controller == CC_ALL_SOUND_OFF =>
        {
            Some(SynthMessage::AllNotesOff)
        }
        _ => None,
    }
}

/// Equal-tempered pitch, A4 = 440 Hz = MIDI note 69.
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Nearest 7-bit velocity for a normalized level.
#[inline]
pub fn velocity_to_midi(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * 127.0).round() as u8
}
