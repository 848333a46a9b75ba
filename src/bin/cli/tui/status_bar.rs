use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app_state::{Mode, TuiState};

/// Pile sizes for the current study scope
pub fn draw_counts(f: &mut Frame, area: Rect, state: &TuiState) {
    let counts = state.app.session.counts();
    let line = Line::from(vec![
        Span::styled(format!(" To do {} ", counts.todo), Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(format!(" Correct {} ", counts.done), Style::default().fg(Color::Green)),
        Span::raw(" "),
        Span::styled(format!(" Incorrect {} ", counts.redo), Style::default().fg(Color::Red)),
        Span::styled(
            format!("   {} of {} cards in scope", counts.total(), state.app.session.cards().len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    // Show flash message if present
    if let Some(ref msg) = state.flash_message {
        let color = if msg.starts_with("Error") { Color::Red } else { Color::Green };
        let flash = Paragraph::new(format!(" {}", msg))
            .style(Style::default().bg(color).fg(Color::Black));
        f.render_widget(flash, area);
        return;
    }

    match (&state.mode, &state.prompt) {
        (Mode::Prompt, Some(kind)) => {
            let label = format!(" {}: ", kind.label());
            let text = format!("{}{}\u{2588}", label, state.input_text);
            let prompt = Paragraph::new(text)
                .style(Style::default().bg(Color::Blue).fg(Color::White));
            f.render_widget(prompt, area);
        }
        _ => {
            let hints = match state.mode {
                Mode::Stacks => {
                    " Enter: include/exclude  A: all  a: add  n: rename  Esc: back  ?: help  q: quit "
                }
                _ => {
                    " Space: flip  c: correct  x: incorrect  r: retry  s: reshuffle  Tab: stacks  ?: help  q: quit "
                }
            };

            let status = Paragraph::new(hints)
                .style(Style::default().bg(Color::DarkGray).fg(Color::White));
            f.render_widget(status, area);
        }
    }
}
