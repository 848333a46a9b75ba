use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use cardstack_lib::flashcards::{CurrentCard, Face};

use super::app_state::{Mode, TuiState};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    let is_active = state.mode == Mode::Study;
    let current = state.app.session.current_card();
    let face = state.app.session.face();

    let side = match face {
        Face::Front => "Front",
        Face::Back => "Back",
    };
    let title = match &current {
        CurrentCard::Card(card) => format!(" #{} \u{00b7} {} \u{00b7} {} ", card.id, card.stack, side),
        CurrentCard::Sentinel => format!(" {} ", side),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    let text_style = match (&current, face) {
        (CurrentCard::Sentinel, _) => Style::default().fg(Color::DarkGray),
        (_, Face::Front) => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        (_, Face::Back) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    };

    let mut lines = vec![Line::from("")];
    lines.extend(
        current
            .text(face)
            .lines()
            .map(|l| Line::from(Span::styled(format!("  {}", l), text_style))),
    );

    if current.is_sentinel() {
        lines.push(Line::from(""));
        let hint = if state.app.session.cards().is_empty() {
            "  No cards yet. Press a to add one."
        } else {
            "  Pile empty. Press r to retry incorrect cards or s to reshuffle."
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
