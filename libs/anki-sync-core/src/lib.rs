//! Core reconciliation engine syncing note-derived flashcards into a
//! remote flashcard application.
//!
//! Provides:
//! - Deck/card value types shared between snapshots
//! - Pluggable equality policies for card and deck identity
//! - A planner turning (source, existing) snapshots into an ordered
//!   instruction list
//! - An executor replaying that list against an abstract deck repository
//!
//! The crate performs no I/O of its own; the [`DeckRepository`] port is
//! the only side-effect channel, implemented by the surrounding
//! application.

pub mod equality;
pub mod error;
pub mod executor;
pub mod instruction;
pub mod planner;
pub mod repository;
pub mod types;

pub use equality::{
    content_equal, CardEqualityChecker, DeckIdEqualityChecker, ExactCardEquality,
    ExactDeckIdEquality,
};
pub use error::{Result, SyncError};
pub use executor::InstructionExecutor;
pub use instruction::{PlanStats, SyncInstruction};
pub use planner::Reconciler;
pub use repository::DeckRepository;
pub use types::{Card, CardContent, Deck, DeckId, DEFAULT_DECK_NAME};
