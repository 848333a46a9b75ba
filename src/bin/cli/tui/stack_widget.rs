use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use super::app_state::{Mode, TuiState};

pub fn draw(f: &mut Frame, area: Rect, state: &mut TuiState) {
    let is_active = state.mode == Mode::Stacks;
    let session = &state.app.session;

    let block = Block::default()
        .title(" Stacks ")
        .borders(Borders::ALL)
        .border_style(if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    let mut items: Vec<ListItem> = session.stacks().iter().map(|stack| {
        let count = session.cards().iter().filter(|c| c.stack == *stack).count();
        let (mark, style) = if session.selection().contains(stack) {
            ("[x] ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            ("[ ] ", Style::default().fg(Color::DarkGray))
        };
        ListItem::new(format!("{}{} ({})", mark, stack, count)).style(style)
    }).collect();

    items.push(
        ListItem::new(format!("+ {}", session.new_stack_label()))
            .style(Style::default().fg(Color::Blue)),
    );

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(if is_active { Color::DarkGray } else { Color::Black })
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.stack_selected));

    f.render_stateful_widget(list, area, &mut list_state);
}
