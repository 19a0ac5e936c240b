//! Shared test infrastructure: an in-memory deck repository standing in
//! for the remote flashcard application, plus deck/card fixtures.

pub mod fixtures;

use std::sync::Mutex;

use anki_sync_core::{Deck, DeckId, DeckRepository, Result, SyncError};

/// In-memory stand-in for the remote store.
///
/// Records every port operation so tests can assert on call sequences,
/// and assigns incrementing remote ids on upsert the way the real
/// application does. A named operation can be made to fail to exercise
/// the executor's fail-fast path.
#[derive(Default)]
pub struct MemoryDeckRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    decks: Vec<Deck>,
    next_id: i64,
    calls: Vec<String>,
    fail_on: Option<String>,
    sync_count: usize,
}

impl Inner {
    fn assign_ids(&mut self, deck: &Deck) -> Deck {
        let mut stored = deck.clone();
        for card in &mut stored.cards {
            if card.remote_id.is_none() {
                self.next_id += 1;
                card.remote_id = Some(self.next_id);
            }
        }
        stored
    }

    fn check_fault(&self, operation: &str) -> Result<()> {
        if self.fail_on.as_deref() == Some(operation) {
            return Err(SyncError::Remote(format!("injected fault in {operation}")));
        }
        Ok(())
    }
}

impl MemoryDeckRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with decks, assigning remote ids to their cards as
    /// if they had been persisted earlier.
    pub fn with_decks(decks: Vec<Deck>) -> Self {
        let repo = Self::new();
        {
            let mut inner = repo.inner.lock().unwrap();
            for deck in &decks {
                let stored = inner.assign_ids(deck);
                inner.decks.push(stored);
            }
        }
        repo
    }

    /// Snapshot of the stored decks, usable as an "existing" input.
    pub fn decks(&self) -> Vec<Deck> {
        self.inner.lock().unwrap().decks.clone()
    }

    /// Every recorded port call, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn sync_count(&self) -> usize {
        self.inner.lock().unwrap().sync_count
    }

    /// Make the named operation fail until [`clear_faults`] is called.
    pub fn fail_on(&self, operation: &str) {
        self.inner.lock().unwrap().fail_on = Some(operation.to_string());
    }

    pub fn clear_faults(&self) {
        self.inner.lock().unwrap().fail_on = None;
    }
}

impl DeckRepository for MemoryDeckRepository {
    async fn get_deck(&self, id: &DeckId) -> Result<Option<Deck>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("get_deck:{id}"));
        inner.check_fault("get_deck")?;
        Ok(inner.decks.iter().find(|deck| deck.id == *id).cloned())
    }

    async fn upsert_deck(&self, deck: &Deck) -> Result<Deck> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("upsert_deck:{}", deck.id));
        inner.check_fault("upsert_deck")?;

        let stored = inner.assign_ids(deck);
        match inner.decks.iter().position(|d| d.id == deck.id) {
            Some(index) => inner.decks[index] = stored.clone(),
            None => inner.decks.push(stored.clone()),
        }
        Ok(stored)
    }

    async fn delete_deck(&self, id: &DeckId) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("delete_deck:{id}"));
        inner.check_fault("delete_deck")?;
        inner.decks.retain(|deck| deck.id != *id);
        Ok(())
    }

    async fn get_all_deck_ids(&self) -> Result<Vec<DeckId>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("get_all_deck_ids".to_string());
        inner.check_fault("get_all_deck_ids")?;
        Ok(inner.decks.iter().map(|deck| deck.id.clone()).collect())
    }

    async fn sync_with_remote(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("sync_with_remote".to_string());
        inner.check_fault("sync_with_remote")?;
        inner.sync_count += 1;
        Ok(())
    }
}
