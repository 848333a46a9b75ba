//! Flashcards grouped into stacks, studied in shuffled sessions
//!
//! This module provides:
//! - The card collection and its reducer (add, remove, edit, rename stack)
//! - Stack derivation and the study-scope selection
//! - The todo/done/redo pile state machine for a review session
//! - `StudySession`, which ties these to the synchronizer

pub mod models;
pub mod review;
pub mod session;
pub mod stacks;
pub mod store;

pub use models::*;
pub use review::{Piles, ReviewSession, ReviewState};
pub use session::{CardView, StudySession, StudySnapshot};
pub use stacks::{derive_stacks, filtered_cards, StackSelection};
pub use store::{CardAction, CardStore, Outcome, Rejection};
