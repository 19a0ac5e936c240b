//! Applies a reconciliation plan against the remote deck repository, one
//! instruction at a time, failing fast.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::equality::{CardEqualityChecker, ExactCardEquality};
use crate::error::{Result, SyncError};
use crate::instruction::SyncInstruction;
use crate::repository::DeckRepository;
use crate::types::{Card, Deck, DeckId};

/// Replays an instruction list against a [`DeckRepository`].
///
/// Execution is strictly sequential: later instructions may depend on the
/// deck/card state left by earlier ones (a deck must exist before a card
/// lands in it, a card is looked up before it moves). The first failure
/// aborts the remaining plan with no rollback; re-running reconciliation
/// against the resulting remote state computes the follow-up diff.
pub struct InstructionExecutor<R: DeckRepository> {
    repository: R,
    card_identity: Box<dyn CardEqualityChecker>,
}

impl<R: DeckRepository> InstructionExecutor<R> {
    pub fn new(repository: R) -> Self {
        Self::with_card_checker(repository, Box::new(ExactCardEquality))
    }

    /// Use a non-default card identity for locating referenced cards.
    pub fn with_card_checker(repository: R, card_identity: Box<dyn CardEqualityChecker>) -> Self {
        Self {
            repository,
            card_identity,
        }
    }

    /// Access the wrapped repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Apply every instruction in order. Cancellation is checked before
    /// each instruction, never mid-instruction.
    pub async fn execute_instructions(
        &self,
        instructions: &[SyncInstruction],
        cancel: &CancellationToken,
    ) -> Result<()> {
        for instruction in instructions {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            let key = instruction.key();
            debug!(%key, "applying instruction");
            if let Err(err) = self.apply(instruction).await {
                error!(%key, %err, "instruction failed, aborting remaining plan");
                return Err(err);
            }
        }
        Ok(())
    }

    async fn apply(&self, instruction: &SyncInstruction) -> Result<()> {
        match instruction {
            SyncInstruction::CreateDeck(id) => {
                self.repository.upsert_deck(&Deck::empty(id.clone())).await?;
                Ok(())
            }
            SyncInstruction::DeleteDeck(id) => self.repository.delete_deck(id).await,
            SyncInstruction::CreateCard { deck, card } => {
                let mut target = self.fetch_or_create(deck).await?;
                target.cards.push(card.clone());
                let stored = self.repository.upsert_deck(&target).await?;
                if let Some(created) = stored
                    .cards
                    .iter()
                    .rev()
                    .find(|candidate| self.card_identity.are_equal(candidate, card))
                {
                    debug!(
                        remote_id = ?created.remote_id,
                        card = card.identity_key(),
                        "card created"
                    );
                }
                Ok(())
            }
            SyncInstruction::UpdateCard { existing, updated } => {
                let (mut deck, index) = self.locate_card(existing, instruction).await?;
                // The stored card keeps the remote id it was assigned on
                // creation; only the content and timestamp change.
                let remote_id = deck.cards[index].remote_id;
                deck.cards[index] = Card {
                    remote_id,
                    ..updated.clone()
                };
                self.repository.upsert_deck(&deck).await?;
                Ok(())
            }
            SyncInstruction::DeleteCard { card } => {
                let (mut deck, index) = self.locate_card(card, instruction).await?;
                deck.cards.remove(index);
                self.repository.upsert_deck(&deck).await?;
                Ok(())
            }
            SyncInstruction::MoveCard { card, target } => {
                let (mut deck, index) = self.locate_card(card, instruction).await?;
                let moved = deck.cards.remove(index);
                self.repository.upsert_deck(&deck).await?;

                let mut destination = self.fetch_or_create(target).await?;
                destination.cards.push(moved);
                self.repository.upsert_deck(&destination).await?;
                Ok(())
            }
            SyncInstruction::SyncWithRemote => self.repository.sync_with_remote().await,
        }
    }

    async fn fetch_or_create(&self, id: &DeckId) -> Result<Deck> {
        Ok(self
            .repository
            .get_deck(id)
            .await?
            .unwrap_or_else(|| Deck::empty(id.clone())))
    }

    /// Scan every known deck for the referenced card; first match wins.
    async fn locate_card(
        &self,
        card: &Card,
        instruction: &SyncInstruction,
    ) -> Result<(Deck, usize)> {
        for id in self.repository.get_all_deck_ids().await? {
            if let Some(deck) = self.repository.get_deck(&id).await? {
                if let Some(index) = deck
                    .cards
                    .iter()
                    .position(|candidate| self.card_identity.are_equal(candidate, card))
                {
                    return Ok((deck, index));
                }
            }
        }
        Err(SyncError::CardNotFound {
            key: instruction.key(),
        })
    }
}
