//! TUI for pulse
//!
//! Faders for the three parameters, a latching on-screen keyboard and live
//! scope/spectrum views of the output.

mod faders;
mod piano;
mod spectrum;
mod status;
mod waveform;

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use tracing::debug;

use pulse_synth::{
    synth::{
        keyboard::{HIGHEST_KEY, LOWEST_KEY},
        KeyboardState,
    },
    ParamId, ParameterStore,
};

use faders::render_faders;
use piano::{key_offset, render_piano, PIANO_SPAN};
use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

/// Normalized fader movement per key press.
const FINE_NUDGE: f32 = 0.01;
const COARSE_NUDGE: f32 = 0.1;

const VELOCITY_NUDGE: f32 = 0.05;

/// Fixed facts about the running stream.
#[derive(Debug, Clone, Copy)]
pub struct UiInit {
    pub sample_rate: f32,
    pub channels: usize,
    pub polyphony: usize,
}

pub struct UiApp {
    /// Output samples from the audio callback
    scope_rx: Consumer<f32>,
    params: Arc<ParameterStore>,
    keyboard: KeyboardState,
    active_voices: Arc<AtomicUsize>,
    init: UiInit,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    selected: usize,
    /// Lowest note reachable from the computer keyboard
    base_note: u8,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        scope_rx: Consumer<f32>,
        params: Arc<ParameterStore>,
        keyboard: KeyboardState,
        active_voices: Arc<AtomicUsize>,
        init: UiInit,
    ) -> Self {
        Self {
            scope_rx,
            params,
            keyboard,
            active_voices,
            init,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, init.sample_rate),
            selected: 0,
            base_note: 48,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        self.keyboard.all_notes_off();
        Ok(())
    }

    /// Drain the scope ring, keeping the last VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let available = self.scope_rx.slots();
        if available == 0 {
            return;
        }

        if let Ok(chunk) = self.scope_rx.read_chunk(available) {
            let (first, second) = chunk.as_slices();
            self.audio_buffer.extend_from_slice(first);
            self.audio_buffer.extend_from_slice(second);
            chunk.commit_all();
        }

        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                debug!("panic: all notes off");
                self.keyboard.all_notes_off();
            }
            KeyCode::Delete | KeyCode::Backspace => {
                debug!("parameters reset to defaults");
                self.params.reset_to_defaults();
            }
            KeyCode::Tab | KeyCode::Right => self.selected = (self.selected + 1) % ParamId::ALL.len(),
            KeyCode::BackTab | KeyCode::Left => {
                self.selected = (self.selected + ParamId::ALL.len() - 1) % ParamId::ALL.len();
            }
            KeyCode::Up => self.nudge(FINE_NUDGE),
            KeyCode::Down => self.nudge(-FINE_NUDGE),
            KeyCode::PageUp => self.nudge(COARSE_NUDGE),
            KeyCode::PageDown => self.nudge(-COARSE_NUDGE),
            KeyCode::Char('-') => self.shift_octave(-12),
            KeyCode::Char('=') | KeyCode::Char('+') => self.shift_octave(12),
            KeyCode::Char('[') => {
                let velocity = self.keyboard.velocity() - VELOCITY_NUDGE;
                self.keyboard.set_velocity(velocity.max(VELOCITY_NUDGE));
            }
            KeyCode::Char(']') => {
                let velocity = self.keyboard.velocity() + VELOCITY_NUDGE;
                self.keyboard.set_velocity(velocity);
            }
            KeyCode::Char(c) => {
                if let Some(offset) = key_offset(c.to_ascii_lowercase()) {
                    let note = self.base_note + offset;
                    if (LOWEST_KEY..=HIGHEST_KEY).contains(&note) {
                        self.keyboard.toggle(note);
                    }
                }
            }
            _ => {}
        }
    }

    fn nudge(&mut self, delta: f32) {
        let id = ParamId::ALL[self.selected];
        let normalized = self.params.get_normalized(id) + delta;
        self.params.set_normalized(id, normalized);
    }

    fn shift_octave(&mut self, semitones: i16) {
        let lowest = LOWEST_KEY as i16;
        let highest = HIGHEST_KEY as i16 - PIANO_SPAN as i16;
        let base = (self.base_note as i16 + semitones).clamp(lowest, highest);
        self.base_note = base as u8;
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Length(12), // Faders + keyboard
                Constraint::Length(1), // Tooltip
                Constraint::Min(8),    // Scope + spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_status(
            frame,
            rows[0],
            &self.init,
            self.active_voices.load(Ordering::Relaxed),
            self.keyboard.velocity(),
            &stats,
        );

        let controls = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(48), Constraint::Min(20)])
            .split(rows[1]);
        render_faders(frame, controls[0], &self.params, self.selected);
        render_piano(frame, controls[1], &self.keyboard, self.base_note);

        let spec = ParamId::ALL[self.selected].spec();
        let tooltip = Paragraph::new(format!(" {}: {}", spec.name, spec.tooltip))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(tooltip, rows[2]);

        let views = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[3]);
        render_waveform(frame, views[0], &self.audio_buffer);
        render_spectrum(frame, views[1], self.spectrum.data());

        let help = Paragraph::new(
            " [Esc] Quit  [Space] Panic  [Tab/←→] Select  [↑↓ PgUp/PgDn] Adjust  [Del] Defaults  [-/=] Octave  [ [ ] ] Velocity  [z..m q..i] Keys",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[4]);
    }
}
