//! A study session: the card store, stack selection, review piles and the
//! synchronizer behind one action surface.
//!
//! After every card mutation the session, in order:
//! 1. queues a write-through of the new collection,
//! 2. re-derives the stacks and reconciles the selection,
//! 3. recomputes the filtered ids and reshuffles when they changed.
//!
//! Piles therefore never hold an id whose card was deleted or filtered out.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::models::{Card, CardId, CurrentCard, ExportRow, Face, NewCard, PileCounts};
use super::review::{ReviewSession, ReviewState};
use super::stacks::{derive_stacks, filtered_cards, filtered_ids, StackSelection};
use super::store::{CardAction, CardStore, Outcome};
use crate::config::AppConfig;
use crate::storage::StoreBackend;
use crate::sync::{SyncStatus, Synchronizer};

/// The card shown to the user, flattened for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CardId>,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub sentinel: bool,
}

impl From<&CurrentCard> for CardView {
    fn from(current: &CurrentCard) -> Self {
        Self {
            id: current.id(),
            front: current.front().to_string(),
            back: current.back().to_string(),
            stack: match current {
                CurrentCard::Card(card) => Some(card.stack.clone()),
                CurrentCard::Sentinel => None,
            },
            sentinel: current.is_sentinel(),
        }
    }
}

/// Observable state returned by every action
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySnapshot {
    pub cards: Vec<Card>,
    pub stacks: Vec<String>,
    pub selected_stacks: Vec<String>,
    pub counts: PileCounts,
    pub current: CardView,
    pub face: Face,
    /// What the action that produced this snapshot did
    #[serde(skip)]
    pub outcome: Outcome,
}

pub struct StudySession {
    store: CardStore,
    stacks: Vec<String>,
    selection: StackSelection,
    filtered: Vec<CardId>,
    review: ReviewSession,
    rng: StdRng,
    sync: Synchronizer,
    new_stack_label: String,
}

impl StudySession {
    /// Load the durable store and start a session over its cards.
    ///
    /// Returns only after the initial load has settled, so no action can run
    /// against a half-loaded collection.
    pub async fn open(config: &AppConfig, backend: &dyn StoreBackend) -> Self {
        let (sync, cards) =
            Synchronizer::start(backend, &config.store_name, &config.default_stack).await;
        Self::new(config, sync, cards)
    }

    /// Start a session over already-loaded cards
    pub fn new(config: &AppConfig, sync: Synchronizer, loaded: Vec<Card>) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut session = Self {
            store: CardStore::new(config.default_stack.clone()),
            stacks: Vec::new(),
            selection: StackSelection::new(),
            filtered: Vec::new(),
            review: ReviewSession::new(),
            rng,
            sync,
            new_stack_label: config.new_stack_label.clone(),
        };

        for card in loaded {
            if let Outcome::Rejected(rejection) = session.store.apply(CardAction::Load(card)) {
                log::warn!("Skipping stored card: {}", rejection);
            }
        }

        session.refresh_scope();
        session
    }

    // ==================== Card Actions ====================

    pub fn add(&mut self, front: &str, back: &str, stack: &str) -> StudySnapshot {
        self.dispatch(CardAction::Add {
            card: NewCard::new(front, back),
            stack: stack.to_string(),
        })
    }

    pub fn edit(&mut self, id: CardId, front: &str, back: &str, stack: Option<&str>) -> StudySnapshot {
        self.dispatch(CardAction::Edit {
            id,
            front: front.to_string(),
            back: back.to_string(),
            stack: stack.map(str::to_string),
        })
    }

    pub fn remove(&mut self, id: CardId) -> StudySnapshot {
        self.dispatch(CardAction::Remove(id))
    }

    pub fn rename_stack(&mut self, old: &str, new: &str) -> StudySnapshot {
        self.dispatch(CardAction::RenameStack {
            old: old.to_string(),
            new: new.to_string(),
        })
    }

    fn dispatch(&mut self, action: CardAction) -> StudySnapshot {
        let outcome = self.store.apply(action);
        if outcome.is_applied() {
            self.sync
                .write_through(self.store.revision(), self.store.snapshot());
            self.refresh_scope();
        }
        self.snapshot_with(outcome)
    }

    // ==================== Stack Selection ====================

    pub fn toggle_stack(&mut self, stack: &str) -> StudySnapshot {
        let outcome = self.selection.toggle(stack, &self.stacks);
        if outcome.is_applied() {
            self.refresh_scope();
        }
        self.snapshot_with(outcome)
    }

    pub fn select_all_stacks(&mut self) -> StudySnapshot {
        let outcome = if self.selection.selected() == self.stacks.as_slice() {
            Outcome::Unchanged
        } else {
            self.selection = StackSelection::all(&self.stacks);
            self.refresh_scope();
            Outcome::Applied
        };
        self.snapshot_with(outcome)
    }

    // ==================== Review Actions ====================

    pub fn mark_correct(&mut self) -> StudySnapshot {
        self.ensure_consistent();
        let outcome = match self.review.mark_correct() {
            Some(_) => Outcome::Applied,
            None => Outcome::Unchanged,
        };
        self.snapshot_with(outcome)
    }

    pub fn mark_incorrect(&mut self) -> StudySnapshot {
        self.ensure_consistent();
        let outcome = match self.review.mark_incorrect() {
            Some(_) => Outcome::Applied,
            None => Outcome::Unchanged,
        };
        self.snapshot_with(outcome)
    }

    pub fn retry_incorrect(&mut self) -> StudySnapshot {
        self.ensure_consistent();
        let outcome = match self.review.retry_incorrect() {
            0 => Outcome::Unchanged,
            _ => Outcome::Applied,
        };
        self.snapshot_with(outcome)
    }

    /// Reshuffle the filtered cards into a fresh `todo` pile
    pub fn reset(&mut self) -> StudySnapshot {
        self.reset_piles();
        self.snapshot_with(Outcome::Applied)
    }

    pub fn flip(&mut self) -> StudySnapshot {
        self.review.flip();
        self.snapshot_with(Outcome::Applied)
    }

    // ==================== Queries ====================

    pub fn snapshot(&self) -> StudySnapshot {
        self.snapshot_with(Outcome::Unchanged)
    }

    pub fn cards(&self) -> &[Card] {
        self.store.cards()
    }

    pub fn stacks(&self) -> &[String] {
        &self.stacks
    }

    pub fn selection(&self) -> &StackSelection {
        &self.selection
    }

    pub fn review(&self) -> &ReviewSession {
        &self.review
    }

    /// Cards in the current study scope, in collection order
    pub fn filtered_cards(&self) -> Vec<&Card> {
        filtered_cards(self.store.cards(), &self.selection)
    }

    pub fn current_card(&self) -> CurrentCard {
        self.review.current_card(&self.filtered_cards())
    }

    pub fn counts(&self) -> PileCounts {
        self.review.counts()
    }

    pub fn face(&self) -> Face {
        self.review.face()
    }

    /// Every card as `(front, back, stack)`, in collection order
    pub fn export(&self) -> Vec<ExportRow> {
        self.store.cards().iter().map(ExportRow::from).collect()
    }

    pub fn new_stack_label(&self) -> &str {
        &self.new_stack_label
    }

    pub fn default_stack(&self) -> &str {
        self.store.default_stack()
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    /// Wait for pending write-throughs
    pub async fn flush(&self) {
        self.sync.flush().await;
    }

    /// Write anything pending and stop the synchronizer
    pub async fn close(mut self) -> SyncStatus {
        self.sync.shutdown().await;
        self.sync.status()
    }

    // ==================== Internals ====================

    /// Re-derive stacks, reconcile the selection and reshuffle if the
    /// filtered ids changed
    fn refresh_scope(&mut self) {
        self.stacks = derive_stacks(self.store.cards());
        self.selection.reconcile(&self.stacks);

        let filtered = filtered_ids(self.store.cards(), &self.selection);
        if filtered != self.filtered || self.review.state() == ReviewState::NotStarted {
            self.filtered = filtered;
            self.reset_piles();
        }
    }

    fn reset_piles(&mut self) {
        self.review.reset(&self.filtered, &mut self.rng);
    }

    fn ensure_consistent(&mut self) {
        if !self.review.is_consistent_with(&self.filtered) {
            log::warn!("Review piles out of step with the selected cards, reshuffling");
            self.reset_piles();
        }
    }

    fn snapshot_with(&self, outcome: Outcome) -> StudySnapshot {
        StudySnapshot {
            cards: self.store.cards().to_vec(),
            stacks: self.stacks.clone(),
            selected_stacks: self.selection.selected().to_vec(),
            counts: self.review.counts(),
            current: CardView::from(&self.current_card()),
            face: self.review.face(),
            outcome,
        }
    }
}
