//! Reconciliation engine: turns a (source, existing) pair of deck
//! snapshots into the ordered instruction list that brings the remote
//! collection in line with the source.

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::equality::{
    content_equal, CardEqualityChecker, DeckIdEqualityChecker, ExactCardEquality,
    ExactDeckIdEquality,
};
use crate::error::{Result, SyncError};
use crate::instruction::{PlanStats, SyncInstruction};
use crate::types::{Card, Deck, DeckId};

/// Collects instructions, deduplicating equivalent ones by stable key
/// while preserving first-emission order.
struct PlanBuilder {
    instructions: Vec<SyncInstruction>,
    seen: HashSet<String>,
}

impl PlanBuilder {
    fn new() -> Self {
        Self {
            instructions: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, instruction: SyncInstruction) {
        if self.seen.insert(instruction.key()) {
            self.instructions.push(instruction);
        }
    }

    fn finish(self) -> Vec<SyncInstruction> {
        self.instructions
    }
}

/// Computes reconciliation plans. Holds the injected equality policies;
/// [`Reconciler::new`] uses the exact defaults.
pub struct Reconciler {
    card_identity: Box<dyn CardEqualityChecker>,
    deck_identity: Box<dyn DeckIdEqualityChecker>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Self::with_checkers(Box::new(ExactCardEquality), Box::new(ExactDeckIdEquality))
    }

    pub fn with_checkers(
        card_identity: Box<dyn CardEqualityChecker>,
        deck_identity: Box<dyn DeckIdEqualityChecker>,
    ) -> Self {
        Self {
            card_identity,
            deck_identity,
        }
    }

    /// Produce the ordered instruction list reconciling `existing_decks`
    /// toward `source_decks`.
    ///
    /// The order is execution order: deck deletions, then new decks with
    /// their cards, then per-card updates/moves/creates for matched
    /// decks, then deletions of unclaimed existing cards, and finally the
    /// unconditional terminal `SyncWithRemote`. Cancellation is checked
    /// between phases; a cancelled token yields `SyncError::Cancelled`,
    /// never a partial plan.
    pub fn accumulate_sync_instructions(
        &self,
        source_decks: &[Deck],
        existing_decks: &[Deck],
        cancel: &CancellationToken,
    ) -> Result<Vec<SyncInstruction>> {
        let mut plan = PlanBuilder::new();

        // Match existing decks against source identities.
        let matched_source: Vec<Option<usize>> = existing_decks
            .iter()
            .map(|existing| {
                source_decks
                    .iter()
                    .position(|source| self.deck_identity.are_equal(&source.id, &existing.id))
            })
            .collect();
        checkpoint(cancel)?;

        // Deck deletion with ancestor protection.
        let mut deleted_decks: HashSet<usize> = HashSet::new();
        for (index, existing) in existing_decks.iter().enumerate() {
            if matched_source[index].is_some() {
                continue;
            }
            if existing.id.is_default() {
                debug!(deck = %existing.id, "skipping deletion of default deck");
                continue;
            }
            if self.protects_descendant(&existing.id, source_decks, existing_decks) {
                debug!(deck = %existing.id, "skipping deletion of ancestor deck");
                continue;
            }
            deleted_decks.insert(index);
            plan.push(SyncInstruction::DeleteDeck(existing.id.clone()));
        }
        checkpoint(cancel)?;

        // Brand-new decks, created together with every card they hold.
        // No card matching is attempted for these.
        for source in source_decks {
            let is_new = !existing_decks
                .iter()
                .any(|existing| self.deck_identity.are_equal(&source.id, &existing.id));
            if !is_new {
                continue;
            }
            plan.push(SyncInstruction::CreateDeck(source.id.clone()));
            for card in &source.cards {
                plan.push(SyncInstruction::CreateCard {
                    deck: source.id.clone(),
                    card: card.clone(),
                });
            }
        }
        checkpoint(cancel)?;

        // Card reconciliation for matched decks. Each source card is
        // looked up across every existing deck so a card moved between
        // note files is recognized rather than recreated.
        let mut claimed_cards: HashSet<(usize, usize)> = HashSet::new();
        for source in source_decks {
            let Some(matched_index) = existing_decks
                .iter()
                .position(|existing| self.deck_identity.are_equal(&source.id, &existing.id))
            else {
                continue;
            };

            for card in &source.cards {
                match self.find_card(card, existing_decks) {
                    None => plan.push(SyncInstruction::CreateCard {
                        deck: source.id.clone(),
                        card: card.clone(),
                    }),
                    Some((deck_index, card_index)) => {
                        claimed_cards.insert((deck_index, card_index));
                        let existing_card = &existing_decks[deck_index].cards[card_index];
                        let changed = !content_equal(card, existing_card);

                        if deck_index == matched_index {
                            if changed || card.date_modified > existing_card.date_modified {
                                plan.push(SyncInstruction::UpdateCard {
                                    existing: existing_card.clone(),
                                    updated: card.clone(),
                                });
                            }
                        } else {
                            if changed {
                                plan.push(SyncInstruction::UpdateCard {
                                    existing: existing_card.clone(),
                                    updated: card.clone(),
                                });
                            }
                            plan.push(SyncInstruction::MoveCard {
                                card: existing_card.clone(),
                                target: source.id.clone(),
                            });
                        }
                    }
                }
            }
        }
        checkpoint(cancel)?;

        // Existing cards no source card claimed. Decks scheduled for
        // deletion take their cards with them, so they are not scanned.
        for (deck_index, existing) in existing_decks.iter().enumerate() {
            if deleted_decks.contains(&deck_index) {
                continue;
            }
            for (card_index, card) in existing.cards.iter().enumerate() {
                if !claimed_cards.contains(&(deck_index, card_index)) {
                    plan.push(SyncInstruction::DeleteCard { card: card.clone() });
                }
            }
        }

        // The remote application syncs with its cloud backend on every
        // run, even for an empty diff.
        plan.push(SyncInstruction::SyncWithRemote);

        let plan = plan.finish();
        info!(
            instructions = plan.len(),
            stats = ?PlanStats::from_plan(&plan),
            "reconciliation plan ready"
        );
        Ok(plan)
    }

    /// Whether `id` is a proper ancestor of any other deck in the
    /// combined snapshot.
    ///
    /// Evaluated once against the original source ∪ existing union,
    /// deliberately not recomputed after scheduled deletions: a deck
    /// stays protected even when the descendant justifying protection is
    /// itself scheduled for deletion.
    fn protects_descendant(
        &self,
        id: &DeckId,
        source_decks: &[Deck],
        existing_decks: &[Deck],
    ) -> bool {
        source_decks
            .iter()
            .map(|deck| &deck.id)
            .chain(existing_decks.iter().map(|deck| &deck.id))
            .filter(|other| !self.deck_identity.are_equal(id, other))
            .any(|other| id.is_ancestor_of(other))
    }

    /// First identity match for `card`, scanning every existing deck in
    /// order. First match wins.
    fn find_card(&self, card: &Card, existing_decks: &[Deck]) -> Option<(usize, usize)> {
        existing_decks.iter().enumerate().find_map(|(deck_index, deck)| {
            deck.cards
                .iter()
                .position(|candidate| self.card_identity.are_equal(card, candidate))
                .map(|card_index| (deck_index, card_index))
        })
    }
}

fn checkpoint(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }
    Ok(())
}
