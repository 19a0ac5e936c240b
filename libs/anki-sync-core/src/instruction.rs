//! The closed set of mutation instructions a reconciliation produces.

use serde::{Deserialize, Serialize};

use crate::types::{Card, DeckId};

/// One mutation to apply against the remote deck store.
///
/// The set is closed: the executor dispatches with an exhaustive match,
/// so adding a variant here forces every dispatch site to handle it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncInstruction {
    /// Create an empty deck with this identity.
    CreateDeck(DeckId),
    /// Delete the deck with this identity.
    DeleteDeck(DeckId),
    /// Append a card to the target deck.
    CreateCard { deck: DeckId, card: Card },
    /// Replace the content of `existing` (located wherever it currently
    /// lives) with `updated`.
    UpdateCard { existing: Card, updated: Card },
    /// Remove the card from whichever deck currently holds it.
    DeleteCard { card: Card },
    /// Move the card from its current deck into `target`.
    MoveCard { card: Card, target: DeckId },
    /// Trigger the remote application's own cloud synchronization. Ends
    /// every plan, even an empty diff.
    SyncWithRemote,
}

impl SyncInstruction {
    /// Stable key identifying an equivalent instruction within one plan.
    ///
    /// The planner deduplicates by this key; instructions of different
    /// variants, or with differing payloads, never collide.
    pub fn key(&self) -> String {
        match self {
            Self::CreateDeck(id) => format!("CreateDeck:{id}"),
            Self::DeleteDeck(id) => format!("DeleteDeck:{id}"),
            Self::CreateCard { deck, card } => {
                format!("CreateCard:{deck}:{}", card.identity_key())
            }
            Self::UpdateCard { existing, .. } => {
                format!("UpdateCard:{}", existing.identity_key())
            }
            Self::DeleteCard { card } => format!("DeleteCard:{}", card.identity_key()),
            Self::MoveCard { card, target } => {
                format!("MoveCard:{}:{target}", card.identity_key())
            }
            Self::SyncWithRemote => "SyncWithRemote".to_string(),
        }
    }
}

/// Per-variant counts for a produced plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanStats {
    pub decks_created: usize,
    pub decks_deleted: usize,
    pub cards_created: usize,
    pub cards_updated: usize,
    pub cards_deleted: usize,
    pub cards_moved: usize,
}

impl PlanStats {
    pub fn from_plan(plan: &[SyncInstruction]) -> Self {
        let mut stats = Self::default();
        for instruction in plan {
            match instruction {
                SyncInstruction::CreateDeck(_) => stats.decks_created += 1,
                SyncInstruction::DeleteDeck(_) => stats.decks_deleted += 1,
                SyncInstruction::CreateCard { .. } => stats.cards_created += 1,
                SyncInstruction::UpdateCard { .. } => stats.cards_updated += 1,
                SyncInstruction::DeleteCard { .. } => stats.cards_deleted += 1,
                SyncInstruction::MoveCard { .. } => stats.cards_moved += 1,
                SyncInstruction::SyncWithRemote => {}
            }
        }
        stats
    }

    /// True when the plan mutates nothing (only the terminal sync).
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}
