use crate::{
    io::{converter::midi_to_synth, midi::MidiBuffer, AudioBuffer},
    params::ParameterStore,
    synth::{message::SynthMessage, voice::Voice},
};

pub const DEFAULT_POLYPHONY: usize = 8;

/// Fixed pool of voices with first-free allocation and no stealing.
///
/// The pool is sized once at construction; nothing on the render path
/// allocates.
pub struct VoiceBank {
    voices: Vec<Voice>,
    last_sample_rate: f32,
    note_counter: u64,
}

impl VoiceBank {
    pub fn new(polyphony: usize) -> Self {
        let voices = (0..polyphony.max(1)).map(|_| Voice::new()).collect();

        Self {
            voices,
            last_sample_rate: 0.0,
            note_counter: 0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.last_sample_rate = sample_rate;
        for voice in &mut self.voices {
            voice.prepare(sample_rate);
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.last_sample_rate
    }

    /// Apply `midi` in offset order and render every active voice into `out`.
    ///
    /// Voices render up to each event's offset before the event is applied,
    /// so a note-off at offset `n` leaves samples `n..` untouched by that voice.
    pub fn dispatch(&mut self, midi: &MidiBuffer, out: &mut AudioBuffer, params: &ParameterStore) {
        let num_samples = out.num_samples();
        let mut position = 0;

        for timed in midi {
            let offset = timed.offset.min(num_samples.saturating_sub(1));
            if offset > position {
                self.render(out, position, offset - position, params);
                position = offset;
            }

            if let Some(message) = midi_to_synth(timed.event) {
                self.handle_message(message, params);
            }
        }

        if num_samples > position {
            self.render(out, position, num_samples - position, params);
        }
    }

    pub fn handle_message(&mut self, message: SynthMessage, params: &ParameterStore) {
        match message {
            SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity, params),
            SynthMessage::NoteOff { note } => self.note_off(note),
            SynthMessage::AllNotesOff => self.all_notes_off(),
        }
    }

    /// Start `note` on the lowest-indexed free voice. Dropped when the pool
    /// is full.
    pub fn note_on(&mut self, note: u8, velocity: f32, params: &ParameterStore) {
        self.note_counter += 1;
        let stamp = self.note_counter;
        if let Some(voice) = self.allocate_voice(note) {
            voice.start_note(note, velocity, stamp, params);
        }
    }

    /// Stop the most recently started voice playing `note`.
    pub fn note_off(&mut self, note: u8) {
        if let Some(voice) = self.find_voice(note) {
            voice.stop_note();
        }
    }

    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.stop_note();
        }
    }

    fn render(&mut self, out: &mut AudioBuffer, start: usize, len: usize, params: &ParameterStore) {
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.render_block(out, start, len, params);
            }
        }
    }

    fn allocate_voice(&mut self, note: u8) -> Option<&mut Voice> {
        self.voices
            .iter_mut()
            .find(|v| v.is_free() && v.can_play(note))
    }

    fn find_voice(&mut self, note: u8) -> Option<&mut Voice> {
        self.voices
            .iter_mut()
            .filter(|v| v.is_active() && v.note() == note)
            .max_by_key(|v| v.started_at())
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn polyphony(&self) -> usize {
        self.voices.len()
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }
}

impl Default for VoiceBank {
    fn default() -> Self {
        Self::new(DEFAULT_POLYPHONY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::midi::MidiEvent;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn prepared_bank() -> VoiceBank {
        let mut bank = VoiceBank::default();
        bank.set_sample_rate(SAMPLE_RATE);
        bank
    }

    fn on(key: u8) -> MidiEvent {
        MidiEvent::NoteOn {
            channel: 0,
            key,
            velocity: 127,
        }
    }

    fn off(key: u8) -> MidiEvent {
        MidiEvent::NoteOff {
            channel: 0,
            key,
            velocity: 0,
        }
    }

    #[test]
    fn allocates_lowest_free_voice() {
        let params = ParameterStore::new();
        let mut bank = prepared_bank();
        bank.note_on(60, 1.0, &params);
        bank.note_on(64, 1.0, &params);
        assert_eq!(bank.voices()[0].note(), 60);
        assert_eq!(bank.voices()[1].note(), 64);

        bank.note_off(60);
        bank.note_on(67, 1.0, &params);
        assert_eq!(bank.voices()[0].note(), 67);
    }

    #[test]
    fn drops_note_on_when_pool_is_full() {
        let params = ParameterStore::new();
        let mut bank = prepared_bank();
        for note in 60..68 {
            bank.note_on(note, 1.0, &params);
        }
        assert_eq!(bank.active_voice_count(), 8);

        bank.note_on(68, 1.0, &params);
        assert_eq!(bank.active_voice_count(), 8);
        assert!(bank.voices().iter().all(|v| v.note() != 68));
    }

    #[test]
    fn note_off_stops_most_recent_retrigger() {
        let params = ParameterStore::new();
        let mut bank = prepared_bank();
        bank.note_on(60, 1.0, &params);
        bank.note_on(62, 1.0, &params);
        bank.note_on(60, 1.0, &params);

        bank.note_off(60);
        assert!(bank.voices()[0].is_active(), "older voice keeps playing");
        assert!(bank.voices()[2].is_free(), "newest voice for the note stops");
        assert_eq!(bank.active_voice_count(), 2);
    }

    #[test]
    fn note_off_for_unknown_note_is_ignored() {
        let params = ParameterStore::new();
        let mut bank = prepared_bank();
        bank.note_on(60, 1.0, &params);
        bank.note_off(61);
        assert_eq!(bank.active_voice_count(), 1);
    }

    #[test]
    fn all_notes_off_clears_every_voice() {
        let params = ParameterStore::new();
        let mut bank = prepared_bank();
        for note in 40..46 {
            bank.note_on(note, 0.8, &params);
        }
        let mut out = AudioBuffer::new(2, 256);
        bank.dispatch(&MidiBuffer::new(), &mut out, &params);

        bank.all_notes_off();
        assert!(bank
            .voices()
            .iter()
            .all(|v| v.is_free() && v.oscillator().is_cleared()));
    }

    #[test]
    fn events_take_effect_at_their_offset() {
        let params = ParameterStore::new();
        params.set_gain_db(0.0);
        let mut bank = prepared_bank();

        let mut midi = MidiBuffer::new();
        midi.push(100, on(69));
        midi.push(300, off(69));

        let mut out = AudioBuffer::new(1, 512);
        bank.dispatch(&midi, &mut out, &params);

        let samples = out.channel(0);
        assert!(samples[..100].iter().all(|&s| s == 0.0));
        assert!(samples[100..300].iter().any(|&s| s != 0.0));
        assert!(samples[300..].iter().all(|&s| s == 0.0));
        assert_eq!(bank.active_voice_count(), 0);
    }

    #[test]
    fn late_offsets_are_clamped_into_block() {
        let params = ParameterStore::new();
        let mut bank = prepared_bank();
        let mut midi = MidiBuffer::new();
        midi.push(10_000, on(60));

        let mut out = AudioBuffer::new(1, 64);
        bank.dispatch(&midi, &mut out, &params);
        assert_eq!(bank.active_voice_count(), 1);
        assert!(out.channel(0)[..63].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn all_notes_off_controller_is_honoured() {
        let params = ParameterStore::new();
        let mut bank = prepared_bank();
        let mut midi = MidiBuffer::new();
        midi.push(0, on(60));
        midi.push(0, on(64));
        midi.push(
            32,
            MidiEvent::ControlChange {
                channel: 0,
                controller: 123,
                value: 0,
            },
        );

        let mut out = AudioBuffer::new(1, 64);
        bank.dispatch(&midi, &mut out, &params);
        assert_eq!(bank.active_voice_count(), 0);
        assert!(out.channel(0)[32..].iter().all(|&s| s == 0.0));
    }
}
