//! On-screen keyboard and the computer-key piano mapping

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use pulse_synth::synth::{
    keyboard::{HIGHEST_KEY, LOWEST_KEY},
    KeyboardState,
};

/// Semitones covered by the two typing rows.
pub const PIANO_SPAN: u8 = 24;

/// Lower row starts at the base note, upper row one octave higher.
const LOWER_ROW: [char; 12] = ['z', 's', 'x', 'd', 'c', 'v', 'g', 'b', 'h', 'n', 'j', 'm'];
const UPPER_ROW: [char; 13] = ['q', '2', 'w', '3', 'e', 'r', '5', 't', '6', 'y', '7', 'u', 'i'];

/// Semitone offset from the base note for a typed character.
pub fn key_offset(c: char) -> Option<u8> {
    if let Some(i) = LOWER_ROW.iter().position(|&k| k == c) {
        return Some(i as u8);
    }
    UPPER_ROW.iter().position(|&k| k == c).map(|i| 12 + i as u8)
}

fn is_black(note: u8) -> bool {
    matches!(note % 12, 1 | 3 | 6 | 8 | 10)
}

pub fn render_piano(frame: &mut Frame, area: Rect, keyboard: &KeyboardState, base_note: u8) {
    let block = Block::default().title(" Keyboard ").borders(Borders::ALL);

    let held = Style::default().fg(Color::Magenta);
    let white = Style::default().fg(Color::White);
    let black = Style::default().fg(Color::DarkGray);

    let mut upper = Vec::new();
    let mut lower = Vec::new();
    let mut window = Vec::new();
    let mut labels = Vec::new();

    for note in LOWEST_KEY..=HIGHEST_KEY {
        let on = keyboard.is_note_on(note);
        if is_black(note) {
            upper.push(Span::styled("▄", if on { held } else { black }));
            lower.push(Span::raw(" "));
        } else {
            upper.push(Span::styled("█", if on { held } else { white }));
            lower.push(Span::styled("█", if on { held } else { white }));
        }

        let reachable = note >= base_note && note <= base_note + PIANO_SPAN;
        window.push(if reachable {
            Span::styled("▔", Style::default().fg(Color::Cyan))
        } else {
            Span::raw(" ")
        });

        labels.push(if note % 12 == 0 {
            Span::styled(format!("{}", note / 12 - 1), Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(" ")
        });
    }

    let held_names: Vec<String> = keyboard.held_notes().map(note_name).collect();
    let held_line = if held_names.is_empty() {
        Line::from(Span::styled("no keys held", black))
    } else {
        Line::from(Span::styled(held_names.join(" "), held))
    };

    let text = vec![
        Line::from(upper),
        Line::from(lower),
        Line::from(window),
        Line::from(labels),
        Line::from(""),
        held_line,
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn note_name(note: u8) -> String {
    const NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    format!("{}{}", NAMES[(note % 12) as usize], note as i16 / 12 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_rows_cover_two_octaves() {
        assert_eq!(key_offset('z'), Some(0));
        assert_eq!(key_offset('m'), Some(11));
        assert_eq!(key_offset('q'), Some(12));
        assert_eq!(key_offset('i'), Some(PIANO_SPAN));
        assert_eq!(key_offset('p'), None);
    }

    #[test]
    fn names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(37), "C#2");
    }
}
