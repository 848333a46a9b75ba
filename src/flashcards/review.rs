//! Pile-based review state machine
//!
//! A study session partitions the filtered card ids into three piles:
//! - `todo`: not yet tested, head is the card under review
//! - `done`: marked correct
//! - `redo`: marked incorrect, can be appended back onto `todo`
//!
//! Every transition moves ids between piles in one step, so the piles stay
//! disjoint and their union stays equal to the ids handed to the last `reset`.

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;

use super::models::{Card, CardId, CurrentCard, Face, PileCounts};

/// Whether `reset` has run at least once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewState {
    #[default]
    NotStarted,
    InSession,
}

/// The three piles of one study session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Piles {
    pub todo: VecDeque<CardId>,
    pub done: Vec<CardId>,
    pub redo: Vec<CardId>,
}

impl Piles {
    pub fn counts(&self) -> PileCounts {
        PileCounts {
            todo: self.todo.len(),
            done: self.done.len(),
            redo: self.redo.len(),
        }
    }

    fn all_ids(&self) -> impl Iterator<Item = &CardId> {
        self.todo.iter().chain(self.done.iter()).chain(self.redo.iter())
    }
}

/// Session-scoped review state, never persisted
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    piles: Piles,
    face: Face,
    state: ReviewState,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shuffle `ids` into `todo` and empty the other piles
    pub fn reset<R: Rng + ?Sized>(&mut self, ids: &[CardId], rng: &mut R) {
        let mut todo = ids.to_vec();
        todo.shuffle(rng);

        self.piles = Piles {
            todo: todo.into(),
            done: Vec::new(),
            redo: Vec::new(),
        };
        self.face = Face::Front;
        self.state = ReviewState::InSession;
    }

    /// Move the head of `todo` to `done`. No-op when `todo` is empty.
    pub fn mark_correct(&mut self) -> Option<CardId> {
        let id = self.piles.todo.pop_front()?;
        self.piles.done.push(id);
        self.face = Face::Front;
        Some(id)
    }

    /// Move the head of `todo` to `redo`. No-op when `todo` is empty.
    pub fn mark_incorrect(&mut self) -> Option<CardId> {
        let id = self.piles.todo.pop_front()?;
        self.piles.redo.push(id);
        self.face = Face::Front;
        Some(id)
    }

    /// Append all of `redo` to `todo`, keeping its order. Returns how many moved.
    pub fn retry_incorrect(&mut self) -> usize {
        let moved = self.piles.redo.len();
        self.piles.todo.extend(self.piles.redo.drain(..));
        self.face = Face::Front;
        moved
    }

    pub fn flip(&mut self) -> Face {
        self.face = self.face.flipped();
        self.face
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn piles(&self) -> &Piles {
        &self.piles
    }

    pub fn counts(&self) -> PileCounts {
        self.piles.counts()
    }

    /// The card at the head of `todo`, or the sentinel when there is none
    pub fn current_card(&self, filtered: &[&Card]) -> CurrentCard {
        self.piles
            .todo
            .front()
            .and_then(|id| filtered.iter().find(|c| c.id == *id))
            .map(|card| CurrentCard::Card((*card).clone()))
            .unwrap_or(CurrentCard::Sentinel)
    }

    /// True when the piles partition exactly `ids`
    pub fn is_consistent_with(&self, ids: &[CardId]) -> bool {
        let expected: HashSet<&CardId> = ids.iter().collect();
        let mut seen = HashSet::new();
        for id in self.piles.all_ids() {
            if !expected.contains(id) || !seen.insert(id) {
                return false;
            }
        }
        seen.len() == expected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn started(ids: &[CardId]) -> ReviewSession {
        let mut session = ReviewSession::new();
        session.reset(ids, &mut rng());
        session
    }

    #[test]
    fn test_reset_partitions_ids() {
        let ids: Vec<CardId> = (1..=10).collect();
        let session = started(&ids);

        assert_eq!(session.state(), ReviewState::InSession);
        assert_eq!(session.counts().total(), ids.len());
        assert!(session.is_consistent_with(&ids));

        let mut todo: Vec<CardId> = session.piles().todo.iter().copied().collect();
        todo.sort();
        assert_eq!(todo, ids);
    }

    #[test]
    fn test_reset_clears_done_redo_and_face() {
        let mut session = started(&[1, 2, 3]);
        session.mark_correct();
        session.mark_incorrect();
        session.flip();

        session.reset(&[1, 2, 3], &mut rng());
        assert_eq!(session.counts(), PileCounts { todo: 3, done: 0, redo: 0 });
        assert_eq!(session.face(), Face::Front);
    }

    #[test]
    fn test_shuffle_produces_different_orders() {
        let ids: Vec<CardId> = (1..=8).collect();
        let mut session = ReviewSession::new();
        let mut rng = rng();
        let mut orders = HashSet::new();
        for _ in 0..20 {
            session.reset(&ids, &mut rng);
            orders.insert(session.piles().todo.iter().copied().collect::<Vec<_>>());
        }
        assert!(orders.len() > 1);
    }

    #[test]
    fn test_mark_correct_moves_head_to_done() {
        let mut session = started(&[1, 2]);
        let head = *session.piles().todo.front().unwrap();
        session.flip();

        assert_eq!(session.mark_correct(), Some(head));
        assert_eq!(session.piles().done, vec![head]);
        assert!(!session.piles().todo.contains(&head));
        assert_eq!(session.face(), Face::Front);
        assert!(session.is_consistent_with(&[1, 2]));
    }

    #[test]
    fn test_mark_incorrect_moves_head_to_redo() {
        let mut session = started(&[1, 2]);
        let head = *session.piles().todo.front().unwrap();

        assert_eq!(session.mark_incorrect(), Some(head));
        assert_eq!(session.piles().redo, vec![head]);
        assert_eq!(session.counts().total(), 2);
    }

    #[test]
    fn test_mark_on_empty_todo_is_noop() {
        let mut session = started(&[1]);
        session.mark_correct();
        let before = session.piles().clone();

        assert_eq!(session.mark_correct(), None);
        assert_eq!(session.mark_incorrect(), None);
        assert_eq!(session.piles(), &before);
    }

    #[test]
    fn test_mark_before_start_is_noop() {
        let mut session = ReviewSession::new();
        assert_eq!(session.state(), ReviewState::NotStarted);
        assert_eq!(session.mark_correct(), None);
        assert_eq!(session.counts().total(), 0);
    }

    #[test]
    fn test_retry_incorrect_preserves_redo_order() {
        let mut session = started(&[1, 2, 3, 4]);
        let mut wrong = Vec::new();
        wrong.push(session.mark_incorrect().unwrap());
        session.mark_correct();
        wrong.push(session.mark_incorrect().unwrap());
        let remaining: Vec<CardId> = session.piles().todo.iter().copied().collect();

        assert_eq!(session.retry_incorrect(), 2);
        assert!(session.piles().redo.is_empty());

        let todo: Vec<CardId> = session.piles().todo.iter().copied().collect();
        let expected: Vec<CardId> = remaining.into_iter().chain(wrong).collect();
        assert_eq!(todo, expected);
        assert!(session.is_consistent_with(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_flip_does_not_touch_piles() {
        let mut session = started(&[1, 2]);
        let before = session.piles().clone();
        assert_eq!(session.flip(), Face::Back);
        assert_eq!(session.flip(), Face::Front);
        assert_eq!(session.piles(), &before);
    }

    #[test]
    fn test_current_card_is_head_or_sentinel() {
        let cards = vec![Card::new(1, "a", "b", "S1")];
        let filtered: Vec<&Card> = cards.iter().collect();
        let mut session = started(&[1]);

        assert_eq!(session.current_card(&filtered), CurrentCard::Card(cards[0].clone()));
        session.mark_correct();
        assert!(session.current_card(&filtered).is_sentinel());
        assert!(ReviewSession::new().current_card(&[]).is_sentinel());
    }

    #[test]
    fn test_inconsistency_detected() {
        let session = started(&[1, 2]);
        assert!(!session.is_consistent_with(&[1]));
        assert!(!session.is_consistent_with(&[1, 2, 3]));
    }
}
