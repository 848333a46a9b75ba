//! In-memory card collection and the reducer that mutates it
//!
//! Every mutation is a pure reduction `(cards, action) -> cards`. The store keeps
//! the current collection behind an `Arc` and bumps a revision counter whenever
//! the collection is replaced, which is what the synchronizer watches.

use std::sync::Arc;

use thiserror::Error;

use super::models::{Card, CardId, NewCard};

/// A mutation of the card collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    /// Append a new card, assigning `1 + max(existing ids)`
    Add { card: NewCard, stack: String },
    /// Append a card read from durable storage, keeping its id
    Load(Card),
    Remove(CardId),
    Edit {
        id: CardId,
        front: String,
        back: String,
        stack: Option<String>,
    },
    RenameStack { old: String, new: String },
}

/// Why an action left the collection untouched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("card front is empty")]
    EmptyFront,

    #[error("card back is empty")]
    EmptyBack,

    #[error("stack name is empty")]
    EmptyStack,

    #[error("card not found: {0}")]
    UnknownCard(CardId),

    #[error("no card belongs to stack '{0}'")]
    UnknownStack(String),

    #[error("card id already in use: {0}")]
    DuplicateId(CardId),

    #[error("'{0}' is the only selected stack")]
    LastSelectedStack(String),

    #[error("no card id left after {0}")]
    IdSpaceExhausted(CardId),
}

/// Result of applying an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The collection was replaced
    Applied,
    /// The action was valid but produced an identical collection
    Unchanged,
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Id the next `Add` will receive, `None` once the largest id is `CardId::MAX`
pub fn next_id(cards: &[Card]) -> Option<CardId> {
    cards.iter().map(|c| c.id).max().unwrap_or(0).checked_add(1)
}

/// Apply `action` to `cards`, returning the new collection.
///
/// `Ok(None)` means the action is valid but changes nothing.
pub fn reduce(cards: &[Card], action: &CardAction) -> Result<Option<Vec<Card>>, Rejection> {
    match action {
        CardAction::Add { card, stack } => {
            if card.front.is_empty() {
                return Err(Rejection::EmptyFront);
            }
            if card.back.is_empty() {
                return Err(Rejection::EmptyBack);
            }
            if stack.is_empty() {
                return Err(Rejection::EmptyStack);
            }
            let id = next_id(cards).ok_or(Rejection::IdSpaceExhausted(CardId::MAX))?;
            let mut next = cards.to_vec();
            next.push(Card::new(id, card.front.clone(), card.back.clone(), stack.clone()));
            Ok(Some(next))
        }
        CardAction::Load(card) => {
            if cards.iter().any(|c| c.id == card.id) {
                return Err(Rejection::DuplicateId(card.id));
            }
            let mut next = cards.to_vec();
            next.push(card.clone());
            Ok(Some(next))
        }
        CardAction::Remove(id) => {
            if !cards.iter().any(|c| c.id == *id) {
                return Err(Rejection::UnknownCard(*id));
            }
            Ok(Some(cards.iter().filter(|c| c.id != *id).cloned().collect()))
        }
        CardAction::Edit { id, front, back, stack } => {
            let existing = cards
                .iter()
                .find(|c| c.id == *id)
                .ok_or(Rejection::UnknownCard(*id))?;

            let stack = match stack {
                Some(s) if !s.is_empty() => s.clone(),
                _ => existing.stack.clone(),
            };
            let edited = Card::new(*id, front.clone(), back.clone(), stack);
            if *existing == edited {
                return Ok(None);
            }

            Ok(Some(
                cards
                    .iter()
                    .map(|c| if c.id == *id { edited.clone() } else { c.clone() })
                    .collect(),
            ))
        }
        CardAction::RenameStack { old, new } => {
            if new.is_empty() {
                return Err(Rejection::EmptyStack);
            }
            // Only stacks that already own a card can be renamed
            if !cards.iter().any(|c| c.stack == *old) {
                return Err(Rejection::UnknownStack(old.clone()));
            }
            if old == new {
                return Ok(None);
            }

            Ok(Some(
                cards
                    .iter()
                    .map(|c| {
                        if c.stack == *old {
                            Card { stack: new.clone(), ..c.clone() }
                        } else {
                            c.clone()
                        }
                    })
                    .collect(),
            ))
        }
    }
}

/// Owner of the authoritative card collection
#[derive(Debug, Clone)]
pub struct CardStore {
    cards: Arc<Vec<Card>>,
    revision: u64,
    default_stack: String,
}

impl CardStore {
    pub fn new(default_stack: impl Into<String>) -> Self {
        Self {
            cards: Arc::new(Vec::new()),
            revision: 0,
            default_stack: default_stack.into(),
        }
    }

    /// Apply an action. An `Add` with an empty stack name goes to the default stack.
    pub fn apply(&mut self, action: CardAction) -> Outcome {
        let action = match action {
            CardAction::Add { card, stack } if stack.is_empty() => CardAction::Add {
                card,
                stack: self.default_stack.clone(),
            },
            other => other,
        };

        match reduce(&self.cards, &action) {
            Ok(Some(next)) => {
                self.cards = Arc::new(next);
                self.revision += 1;
                Outcome::Applied
            }
            Ok(None) => Outcome::Unchanged,
            Err(rejection) => {
                log::debug!("Card store rejected {:?}: {}", action, rejection);
                Outcome::Rejected(rejection)
            }
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Shared handle to the current collection, cheap to send to the writer
    pub fn snapshot(&self) -> Arc<Vec<Card>> {
        Arc::clone(&self.cards)
    }

    /// Bumped every time the collection is replaced
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn next_id(&self) -> Option<CardId> {
        next_id(&self.cards)
    }

    pub fn default_stack(&self) -> &str {
        &self.default_stack
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn add(store: &mut CardStore, front: &str, back: &str, stack: &str) -> Outcome {
        store.apply(CardAction::Add {
            card: NewCard::new(front, back),
            stack: stack.to_string(),
        })
    }

    #[test]
    fn test_add_assigns_increasing_unique_ids() {
        let mut store = CardStore::new("Stack 1");
        let mut seen = HashSet::new();
        let mut last = 0;

        for i in 0..20 {
            assert_eq!(add(&mut store, &format!("f{}", i), "b", "S"), Outcome::Applied);
            let id = store.cards().last().unwrap().id;
            assert!(id > last);
            assert!(seen.insert(id));
            last = id;
        }
    }

    #[test]
    fn test_add_uses_max_plus_one_after_removal() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "S");
        add(&mut store, "c", "d", "S");
        add(&mut store, "e", "f", "S");
        store.apply(CardAction::Remove(2));
        add(&mut store, "g", "h", "S");

        let ids: Vec<CardId> = store.cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_add_empty_front_rejected_without_consuming_id() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "S");
        let revision = store.revision();

        assert_eq!(
            add(&mut store, "", "b", "S"),
            Outcome::Rejected(Rejection::EmptyFront)
        );
        assert_eq!(
            add(&mut store, "a", "", "S"),
            Outcome::Rejected(Rejection::EmptyBack)
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), revision);

        add(&mut store, "c", "d", "S");
        assert_eq!(store.cards().last().unwrap().id, 2);
    }

    #[test]
    fn test_add_without_stack_uses_default() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "");
        assert_eq!(store.cards()[0].stack, "Stack 1");
    }

    #[test]
    fn test_load_keeps_stored_id() {
        let mut store = CardStore::new("Stack 1");
        store.apply(CardAction::Load(Card::new(42, "a", "b", "S")));
        assert_eq!(store.cards()[0].id, 42);
        assert_eq!(store.next_id(), Some(43));

        assert_eq!(
            store.apply(CardAction::Load(Card::new(42, "x", "y", "S"))),
            Outcome::Rejected(Rejection::DuplicateId(42))
        );
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "S");
        let before = store.snapshot();

        assert_eq!(
            store.apply(CardAction::Remove(9)),
            Outcome::Rejected(Rejection::UnknownCard(9))
        );
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_edit_replaces_text_and_keeps_stack() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "S");
        add(&mut store, "c", "d", "T");

        let outcome = store.apply(CardAction::Edit {
            id: 1,
            front: "A".into(),
            back: "B".into(),
            stack: None,
        });
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(store.get(1), Some(&Card::new(1, "A", "B", "S")));
        assert_eq!(store.get(2), Some(&Card::new(2, "c", "d", "T")));
    }

    #[test]
    fn test_edit_moves_card_between_stacks() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "S");
        store.apply(CardAction::Edit {
            id: 1,
            front: "a".into(),
            back: "b".into(),
            stack: Some("T".into()),
        });
        assert_eq!(store.cards()[0].stack, "T");
    }

    #[test]
    fn test_edit_identical_is_unchanged() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "S");
        let revision = store.revision();

        let outcome = store.apply(CardAction::Edit {
            id: 1,
            front: "a".into(),
            back: "b".into(),
            stack: None,
        });
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_edit_missing_is_noop() {
        let mut store = CardStore::new("Stack 1");
        let outcome = store.apply(CardAction::Edit {
            id: 5,
            front: "a".into(),
            back: "b".into(),
            stack: None,
        });
        assert_eq!(outcome, Outcome::Rejected(Rejection::UnknownCard(5)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_rename_stack_retargets_only_matching_cards() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "Old");
        add(&mut store, "c", "d", "Other");
        add(&mut store, "e", "f", "Old");

        let outcome = store.apply(CardAction::RenameStack {
            old: "Old".into(),
            new: "New".into(),
        });
        assert_eq!(outcome, Outcome::Applied);

        let stacks: Vec<&str> = store.cards().iter().map(|c| c.stack.as_str()).collect();
        assert_eq!(stacks, vec!["New", "Other", "New"]);
    }

    #[test]
    fn test_rename_unowned_stack_fabricates_nothing() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "S");

        let outcome = store.apply(CardAction::RenameStack {
            old: "New Stack".into(),
            new: "Verbs".into(),
        });
        assert_eq!(
            outcome,
            Outcome::Rejected(Rejection::UnknownStack("New Stack".into()))
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.cards()[0].stack, "S");
    }

    #[test]
    fn test_rename_to_empty_rejected() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "S");
        let outcome = store.apply(CardAction::RenameStack {
            old: "S".into(),
            new: String::new(),
        });
        assert_eq!(outcome, Outcome::Rejected(Rejection::EmptyStack));
    }

    #[test]
    fn test_rename_to_same_name_unchanged() {
        let mut store = CardStore::new("Stack 1");
        add(&mut store, "a", "b", "S");
        let outcome = store.apply(CardAction::RenameStack {
            old: "S".into(),
            new: "S".into(),
        });
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_add_after_max_id_is_rejected() {
        let mut store = CardStore::new("Stack 1");
        store.apply(CardAction::Load(Card::new(CardId::MAX, "a", "b", "S")));
        assert_eq!(store.next_id(), None);

        let outcome = add(&mut store, "c", "d", "S");
        assert_eq!(outcome, Outcome::Rejected(Rejection::IdSpaceExhausted(CardId::MAX)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reduce_is_pure() {
        let cards = vec![Card::new(1, "a", "b", "S")];
        let next = reduce(&cards, &CardAction::Remove(1)).unwrap().unwrap();
        assert!(next.is_empty());
        assert_eq!(cards.len(), 1);
    }
}
