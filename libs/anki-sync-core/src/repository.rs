//! Abstract port to the remote flashcard application's deck store.

use crate::error::Result;
use crate::types::{Deck, DeckId};

/// The remote deck store, as the executor sees it.
///
/// Implementations wrap the remote application's transport. Every
/// operation may fail with [`SyncError::Remote`](crate::SyncError::Remote);
/// the executor treats any failure as fatal for the current run. The
/// executor assumes exclusive, non-reentrant access for the duration of a
/// run — callers must not execute two plans concurrently against the same
/// store.
#[allow(async_fn_in_trait)]
pub trait DeckRepository {
    /// Fetch a deck by identity; `None` when the remote has no such deck.
    async fn get_deck(&self, id: &DeckId) -> Result<Option<Deck>>;

    /// Create or replace a deck. Returns the stored deck; cards that had
    /// no remote id come back with one assigned by the remote store.
    async fn upsert_deck(&self, deck: &Deck) -> Result<Deck>;

    /// Delete the deck with this identity.
    async fn delete_deck(&self, id: &DeckId) -> Result<()>;

    /// Identities of every deck the remote currently holds.
    async fn get_all_deck_ids(&self) -> Result<Vec<DeckId>>;

    /// Trigger the remote application's own synchronization with its
    /// cloud backend.
    async fn sync_with_remote(&self) -> Result<()>;
}
