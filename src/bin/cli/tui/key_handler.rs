use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use super::app_state::{Mode, TuiState};

pub fn handle_key(state: &mut TuiState, key: KeyEvent) {
    // Clear flash message on any keypress
    state.flash_message = None;

    match state.mode {
        Mode::Study => handle_study_key(state, key),
        Mode::Stacks => handle_stacks_key(state, key),
        Mode::Prompt => handle_prompt_key(state, key),
    }
}

fn handle_study_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char(' ') | KeyCode::Char('f') => state.flip(),
        KeyCode::Char('c') | KeyCode::Right => state.mark_correct(),
        KeyCode::Char('x') | KeyCode::Left => state.mark_incorrect(),
        KeyCode::Char('r') => state.retry_incorrect(),
        KeyCode::Char('s') => state.reset(),
        KeyCode::Char('a') => state.begin_add(),
        KeyCode::Char('e') => state.begin_edit(),
        KeyCode::Char('d') => state.delete_current(),
        KeyCode::Tab => state.mode = Mode::Stacks,
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
        }
        _ => {}
    }
}

fn handle_stacks_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Esc | KeyCode::Tab => state.mode = Mode::Study,
        KeyCode::Char('j') | KeyCode::Down => state.stack_move_down(),
        KeyCode::Char('k') | KeyCode::Up => state.stack_move_up(),
        KeyCode::Enter | KeyCode::Char(' ') => state.toggle_highlighted_stack(),
        KeyCode::Char('A') => state.select_all_stacks(),
        KeyCode::Char('a') => state.begin_add(),
        KeyCode::Char('n') => state.begin_rename(),
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
        }
        _ => {}
    }
}

fn handle_prompt_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.cancel_prompt(),
        KeyCode::Enter => state.submit_prompt(),
        KeyCode::Backspace => {
            state.input_text.pop();
        }
        KeyCode::Char(c) => {
            state.input_text.push(c);
        }
        _ => {}
    }
}

pub fn handle_mouse(state: &mut TuiState, mouse: MouseEvent) {
    if state.mode == Mode::Prompt {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let col = mouse.column;
            let row = mouse.row;

            // Check if click is in stack panel
            if let Some(ref area) = state.stacks_area {
                if col >= area.x && col < area.x + area.width
                    && row >= area.y && row < area.y + area.height
                {
                    state.mode = Mode::Stacks;

                    // Calculate which row was clicked (account for border)
                    let clicked_idx = row.saturating_sub(area.y + 1) as usize;

                    if clicked_idx < state.stack_rows() {
                        if state.stack_selected == clicked_idx {
                            // Click same row again: toggle
                            state.toggle_highlighted_stack();
                        } else {
                            state.stack_selected = clicked_idx;
                        }
                    }
                    return;
                }
            }

            // Clicking the card flips it
            if let Some(ref area) = state.card_area {
                if col >= area.x && col < area.x + area.width
                    && row >= area.y && row < area.y + area.height
                {
                    state.mode = Mode::Study;
                    state.flip();
                }
            }
        }
        MouseEventKind::ScrollDown if state.mode == Mode::Stacks => state.stack_move_down(),
        MouseEventKind::ScrollUp if state.mode == Mode::Stacks => state.stack_move_up(),
        _ => {}
    }
}
