use ratatui::prelude::*;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::app_state::TuiState;
use super::{card_widget, stack_widget, status_bar};

const HELP: &[&str] = &[
    "Study",
    "  Space/f  flip card        c/\u{2192}  correct      x/\u{2190}  incorrect",
    "  r        retry incorrect  s    reshuffle    d    delete card",
    "  a        add card         e    edit card    Tab  stacks",
    "Stacks",
    "  Enter    include/exclude  A    select all   n    rename",
    "  a        add to stack     j/k  move         Esc  back",
];

pub fn draw(f: &mut Frame, state: &mut TuiState) {
    let size = f.area();

    // Main layout: panels + counts line + status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size);

    let main_area = outer[0];
    let counts_area = outer[1];
    let status_area = outer[2];

    // Horizontal split: stacks (30%) | card (70%)
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(70),
        ])
        .split(main_area);

    let stacks_area = panels[0];
    let card_area = panels[1];

    // Save areas for mouse hit-testing
    state.stacks_area = Some(stacks_area);
    state.card_area = Some(card_area);

    stack_widget::draw(f, stacks_area, state);
    card_widget::draw(f, card_area, state);
    status_bar::draw_counts(f, counts_area, state);
    status_bar::draw(f, status_area, state);

    if state.show_help {
        draw_help(f, main_area);
    }
}

fn draw_help(f: &mut Frame, area: Rect) {
    let height = (HELP.len() as u16 + 2).min(area.height);
    let width = area.width.saturating_sub(4).min(76);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    // Clear the area behind the popup
    f.render_widget(Clear, popup);

    let lines: Vec<Line> = HELP.iter().map(|l| Line::from(*l)).collect();
    let block = Block::default()
        .title(" Keys (? to close) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
