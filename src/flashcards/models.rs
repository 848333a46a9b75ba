//! Data models for the flashcard system

use serde::{Deserialize, Serialize};

/// Identifier assigned by the card store (`1 + max existing id`)
pub type CardId = i64;

/// Text shown on both faces of the placeholder card
pub const EMPTY_MARKER: &str = "Empty";

/// A flashcard with question (front) and answer (back), grouped into a stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub stack: String,
}

impl Card {
    pub fn new(id: CardId, front: impl Into<String>, back: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
            stack: stack.into(),
        }
    }
}

/// A card that has not been given an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub front: String,
    pub back: String,
}

impl NewCard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Which face of the current card is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    pub fn flipped(self) -> Self {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }
}

/// The card under review, or the placeholder shown when nothing is left
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentCard {
    Card(Card),
    /// Never persisted and never matches a real id
    Sentinel,
}

impl CurrentCard {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, CurrentCard::Sentinel)
    }

    pub fn id(&self) -> Option<CardId> {
        match self {
            CurrentCard::Card(card) => Some(card.id),
            CurrentCard::Sentinel => None,
        }
    }

    pub fn front(&self) -> &str {
        match self {
            CurrentCard::Card(card) => &card.front,
            CurrentCard::Sentinel => EMPTY_MARKER,
        }
    }

    pub fn back(&self) -> &str {
        match self {
            CurrentCard::Card(card) => &card.back,
            CurrentCard::Sentinel => EMPTY_MARKER,
        }
    }

    pub fn text(&self, face: Face) -> &str {
        match face {
            Face::Front => self.front(),
            Face::Back => self.back(),
        }
    }
}

/// One row of the tabular export: `(front, back, stack)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub front: String,
    pub back: String,
    pub stack: String,
}

impl From<&Card> for ExportRow {
    fn from(card: &Card) -> Self {
        Self {
            front: card.front.clone(),
            back: card.back.clone(),
            stack: card.stack.clone(),
        }
    }
}

/// Pile sizes reported for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PileCounts {
    pub todo: usize,
    pub done: usize,
    pub redo: usize,
}

impl PileCounts {
    pub fn total(&self) -> usize {
        self.todo + self.done + self.redo
    }
}
