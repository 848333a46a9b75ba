//! Stack derivation and the user-controlled stack selection

use super::models::{Card, CardId};
use super::store::{Outcome, Rejection};

/// Distinct stack names in order of first appearance
pub fn derive_stacks(cards: &[Card]) -> Vec<String> {
    let mut stacks: Vec<String> = Vec::new();
    for card in cards {
        if !stacks.iter().any(|s| *s == card.stack) {
            stacks.push(card.stack.clone());
        }
    }
    stacks
}

/// Cards whose stack is selected, in collection order
pub fn filtered_cards<'a>(cards: &'a [Card], selection: &StackSelection) -> Vec<&'a Card> {
    cards.iter().filter(|c| selection.contains(&c.stack)).collect()
}

pub fn filtered_ids(cards: &[Card], selection: &StackSelection) -> Vec<CardId> {
    filtered_cards(cards, selection).iter().map(|c| c.id).collect()
}

/// Set of stack names included in the study scope.
///
/// Non-empty whenever at least one stack exists, once `reconcile` has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackSelection {
    selected: Vec<String>,
}

impl StackSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(stacks: &[String]) -> Self {
        Self {
            selected: stacks.to_vec(),
        }
    }

    pub fn contains(&self, stack: &str) -> bool {
        self.selected.iter().any(|s| s == stack)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Add or remove `stack`. Removing the last selected stack is refused.
    pub fn toggle(&mut self, stack: &str, stacks: &[String]) -> Outcome {
        if self.contains(stack) {
            if self.selected.len() == 1 {
                return Outcome::Rejected(Rejection::LastSelectedStack(stack.to_string()));
            }
            self.selected.retain(|s| s != stack);
            Outcome::Applied
        } else if stacks.iter().any(|s| s == stack) {
            self.selected.push(stack.to_string());
            Outcome::Applied
        } else {
            Outcome::Rejected(Rejection::UnknownStack(stack.to_string()))
        }
    }

    /// Reset to all stacks when the selection is empty or names a stack that
    /// no longer exists. Returns true when a reset happened.
    pub fn reconcile(&mut self, stacks: &[String]) -> bool {
        let stale = self.selected.iter().any(|s| !stacks.contains(s));
        if self.selected.is_empty() || stale {
            if self.selected.as_slice() == stacks {
                return false;
            }
            log::debug!("Stack selection reset to all {} stacks", stacks.len());
            self.selected = stacks.to_vec();
            return true;
        }
        false
    }
}
