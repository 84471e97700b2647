//! Status bar: stream format, voice usage and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiInit;

pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    init: &UiInit,
    active_voices: usize,
    velocity: f32,
    stats: &AudioStats,
) {
    let block = Block::default().title(" pulse ").borders(Borders::ALL);

    let voice_color = if active_voices >= init.polyphony {
        Color::Red
    } else if active_voices > 0 {
        Color::Green
    } else {
        Color::DarkGray
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {:.1}kHz  {}ch  ", init.sample_rate / 1000.0, init.channels),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Voices {}/{}  ", active_voices, init.polyphony),
            Style::default().fg(voice_color),
        ),
        Span::styled(
            format!("Velocity {:.2}  ", velocity),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
