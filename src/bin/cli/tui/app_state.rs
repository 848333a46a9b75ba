use ratatui::prelude::Rect;

use cardstack_lib::flashcards::{CardId, Outcome, StudySnapshot};

use crate::app::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Study,
    Stacks,
    Prompt,
}

/// Multi-step input collected through the status line
#[derive(Debug, Clone, PartialEq)]
pub enum PromptKind {
    AddFront { stack: String },
    AddBack { stack: String, front: String },
    AddStack { front: String, back: String },
    EditFront { id: CardId },
    EditBack { id: CardId, front: String },
    EditStack { id: CardId, front: String, back: String },
    RenameStack { old: String },
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::AddFront { .. } | PromptKind::EditFront { .. } => "Front",
            PromptKind::AddBack { .. } | PromptKind::EditBack { .. } => "Back",
            PromptKind::AddStack { .. } | PromptKind::EditStack { .. } => "Stack",
            PromptKind::RenameStack { .. } => "Rename stack to",
        }
    }
}

pub struct TuiState<'a> {
    pub app: &'a mut App,
    pub mode: Mode,

    // Stack selector; one row past the last stack is the "new stack" entry
    pub stack_selected: usize,

    pub prompt: Option<PromptKind>,
    pub input_text: String,
    pub flash_message: Option<String>,

    // Panel areas for mouse hit-testing (updated each draw)
    pub stacks_area: Option<Rect>,
    pub card_area: Option<Rect>,

    pub show_help: bool,
    pub quit: bool,
}

impl<'a> TuiState<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self {
            app,
            mode: Mode::Study,
            stack_selected: 0,
            prompt: None,
            input_text: String::new(),
            flash_message: None,
            stacks_area: None,
            card_area: None,
            show_help: false,
            quit: false,
        }
    }

    /// Rows in the stack selector, including the trailing "new stack" entry
    pub fn stack_rows(&self) -> usize {
        self.app.session.stacks().len() + 1
    }

    /// The highlighted stack, `None` on the "new stack" entry
    pub fn highlighted_stack(&self) -> Option<String> {
        self.app.session.stacks().get(self.stack_selected).cloned()
    }

    pub fn stack_move_down(&mut self) {
        if self.stack_selected + 1 < self.stack_rows() {
            self.stack_selected += 1;
        }
    }

    pub fn stack_move_up(&mut self) {
        self.stack_selected = self.stack_selected.saturating_sub(1);
    }

    fn clamp_stack_cursor(&mut self) {
        self.stack_selected = self.stack_selected.min(self.stack_rows() - 1);
    }

    /// Show a rejection in the status line; applied actions stay quiet
    fn report(&mut self, snapshot: StudySnapshot) {
        if let Outcome::Rejected(rejection) = snapshot.outcome {
            self.flash_message = Some(format!("Error: {}", rejection));
        }
        self.clamp_stack_cursor();
    }

    pub fn flip(&mut self) {
        let snapshot = self.app.session.flip();
        self.report(snapshot);
    }

    pub fn mark_correct(&mut self) {
        let snapshot = self.app.session.mark_correct();
        self.report(snapshot);
    }

    pub fn mark_incorrect(&mut self) {
        let snapshot = self.app.session.mark_incorrect();
        self.report(snapshot);
    }

    pub fn retry_incorrect(&mut self) {
        let retried = self.app.session.counts().redo;
        let snapshot = self.app.session.retry_incorrect();
        self.report(snapshot);
        if retried > 0 {
            self.flash_message = Some(format!("Retrying {} card(s)", retried));
        }
    }

    pub fn reset(&mut self) {
        let snapshot = self.app.session.reset();
        self.report(snapshot);
        self.flash_message = Some("Session reshuffled".to_string());
    }

    pub fn toggle_highlighted_stack(&mut self) {
        match self.highlighted_stack() {
            Some(stack) => {
                let snapshot = self.app.session.toggle_stack(&stack);
                self.report(snapshot);
            }
            None => self.begin_add(),
        }
    }

    pub fn select_all_stacks(&mut self) {
        let snapshot = self.app.session.select_all_stacks();
        self.report(snapshot);
    }

    pub fn delete_current(&mut self) {
        let Some(id) = self.app.session.current_card().id() else {
            self.flash_message = Some("No card to delete".to_string());
            return;
        };
        let snapshot = self.app.session.remove(id);
        self.report(snapshot);
        if self.flash_message.is_none() {
            self.flash_message = Some(format!("Deleted card #{}", id));
        }
    }

    fn open_prompt(&mut self, kind: PromptKind, initial: &str) {
        self.prompt = Some(kind);
        self.input_text = initial.to_string();
        self.mode = Mode::Prompt;
    }

    /// Start adding a card to the highlighted stack (or a new one)
    pub fn begin_add(&mut self) {
        let stack = self
            .highlighted_stack()
            .unwrap_or_else(|| self.app.session.new_stack_label().to_string());
        self.open_prompt(PromptKind::AddFront { stack }, "");
    }

    pub fn begin_edit(&mut self) {
        let current = self.app.session.current_card();
        let Some(id) = current.id() else {
            self.flash_message = Some("No card to edit".to_string());
            return;
        };
        let front = current.front().to_string();
        self.open_prompt(PromptKind::EditFront { id }, &front);
    }

    pub fn begin_rename(&mut self) {
        let Some(old) = self.highlighted_stack() else {
            self.flash_message = Some("Select a stack to rename".to_string());
            return;
        };
        self.open_prompt(PromptKind::RenameStack { old: old.clone() }, &old);
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.input_text.clear();
        self.mode = Mode::Study;
    }

    /// Accept the current input and move to the next step or apply the action
    pub fn submit_prompt(&mut self) {
        let Some(kind) = self.prompt.take() else {
            self.mode = Mode::Study;
            return;
        };
        let input = std::mem::take(&mut self.input_text);

        match kind {
            PromptKind::AddFront { stack } => {
                self.open_prompt(PromptKind::AddBack { stack, front: input }, "");
            }
            PromptKind::AddBack { stack, front } => {
                self.open_prompt(PromptKind::AddStack { front, back: input }, &stack);
            }
            PromptKind::AddStack { front, back } => {
                let snapshot = self.app.session.add(&front, &back, input.trim());
                self.finish(snapshot, "Card added");
            }
            PromptKind::EditFront { id } => {
                let back = self
                    .app
                    .find_card(id)
                    .map(|c| c.back)
                    .unwrap_or_default();
                self.open_prompt(PromptKind::EditBack { id, front: input }, &back);
            }
            PromptKind::EditBack { id, front } => {
                let stack = self
                    .app
                    .find_card(id)
                    .map(|c| c.stack)
                    .unwrap_or_default();
                self.open_prompt(PromptKind::EditStack { id, front, back: input }, &stack);
            }
            PromptKind::EditStack { id, front, back } => {
                let stack = input.trim();
                let stack = (!stack.is_empty()).then_some(stack);
                let snapshot = self.app.session.edit(id, &front, &back, stack);
                self.finish(snapshot, "Card updated");
            }
            PromptKind::RenameStack { old } => {
                let snapshot = self.app.session.rename_stack(&old, input.trim());
                self.finish(snapshot, "Stack renamed");
            }
        }
    }

    fn finish(&mut self, snapshot: StudySnapshot, done: &str) {
        let applied = snapshot.outcome.is_applied();
        self.report(snapshot);
        if applied {
            self.flash_message = Some(done.to_string());
        }
        self.mode = Mode::Study;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardstack_lib::sync::Synchronizer;
    use cardstack_lib::{AppConfig, StudySession};

    fn app() -> App {
        let config = AppConfig {
            shuffle_seed: Some(3),
            ..AppConfig::default()
        };
        let session = StudySession::new(&config, Synchronizer::detached(), Vec::new());
        App { session }
    }

    fn type_and_submit(state: &mut TuiState, text: &str) {
        state.input_text = text.to_string();
        state.submit_prompt();
    }

    #[test]
    fn test_add_prompt_walks_front_back_stack() {
        let mut app = app();
        let mut state = TuiState::new(&mut app);

        state.begin_add();
        assert_eq!(state.mode, Mode::Prompt);
        type_and_submit(&mut state, "hola");
        type_and_submit(&mut state, "hello");
        // new-stack entry pre-fills the placeholder label
        assert_eq!(state.input_text, "New Stack");
        type_and_submit(&mut state, "Spanish");

        assert_eq!(state.mode, Mode::Study);
        assert_eq!(state.flash_message.as_deref(), Some("Card added"));
        assert_eq!(state.app.session.stacks(), ["Spanish".to_string()]);
        assert_eq!(state.app.session.counts().todo, 1);
    }

    #[test]
    fn test_rejected_add_is_reported() {
        let mut app = app();
        let mut state = TuiState::new(&mut app);

        state.begin_add();
        type_and_submit(&mut state, "");
        type_and_submit(&mut state, "back");
        type_and_submit(&mut state, "S");

        assert!(state.flash_message.unwrap().starts_with("Error:"));
        assert!(state.app.session.cards().is_empty());
    }

    #[test]
    fn test_edit_prefills_current_card() {
        let mut app = app();
        app.session.add("f", "b", "S");
        let mut state = TuiState::new(&mut app);

        state.begin_edit();
        assert_eq!(state.input_text, "f");
        type_and_submit(&mut state, "f2");
        assert_eq!(state.input_text, "b");
        state.submit_prompt();
        assert_eq!(state.input_text, "S");
        state.submit_prompt();

        assert_eq!(state.app.session.cards()[0].front, "f2");
        assert_eq!(state.app.session.counts().todo, 1);
    }

    #[test]
    fn test_rename_needs_an_existing_stack() {
        let mut app = app();
        app.session.add("f", "b", "S");
        let mut state = TuiState::new(&mut app);

        state.stack_move_down();
        state.begin_rename();
        assert_eq!(state.mode, Mode::Study);

        state.stack_move_up();
        state.begin_rename();
        type_and_submit(&mut state, "T");
        assert_eq!(state.app.session.stacks(), ["T".to_string()]);
    }
}
