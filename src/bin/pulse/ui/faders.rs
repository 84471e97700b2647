//! Vertical parameter faders

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use pulse_synth::{ParamId, ParameterStore};

/// Rows lit for a fader at `ratio` of its travel, rounded to the nearest row.
fn lit_rows(ratio: f32, height: u16) -> u16 {
    (ratio.clamp(0.0, 1.0) * height as f32).round() as u16
}

/// Render one column per parameter; `selected` gets the highlight.
pub fn render_faders(frame: &mut Frame, area: Rect, params: &ParameterStore, selected: usize) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    for (i, (id, column)) in ParamId::ALL.iter().zip(columns.iter()).enumerate() {
        let spec = id.spec();

        let (color, border) = if i == selected {
            (Color::Cyan, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        } else {
            (Color::Gray, Style::default().fg(Color::DarkGray))
        };

        let block = Block::default()
            .title(format!(" {} ", spec.name))
            .borders(Borders::ALL)
            .border_style(border);
        let inner = block.inner(*column);
        frame.render_widget(block, *column);

        // Last row holds the value readout.
        let travel = inner.height.saturating_sub(1);
        let lit = lit_rows(params.get_normalized(*id), travel);

        let mut lines: Vec<Line> = (0..travel)
            .map(|row| {
                if row >= travel - lit {
                    Line::styled("███", Style::default().fg(color))
                } else {
                    Line::styled(" │ ", Style::default().fg(Color::DarkGray))
                }
            })
            .collect();
        lines.push(Line::styled(spec.format(params.get(*id)), Style::default().fg(color)));

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}
