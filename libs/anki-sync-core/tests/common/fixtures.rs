//! Deck and card fixtures shared across integration tests.

use chrono::{DateTime, TimeZone, Utc};

use anki_sync_core::{Card, Deck, DeckId};

pub fn date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

pub fn later() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
}

pub fn qa(question: &str, answer: &str) -> Card {
    Card::question_answer(question, answer, date())
}

pub fn deck(name: &str, cards: Vec<Card>) -> Deck {
    Deck::new(DeckId::top_level(name), cards)
}

pub fn deck_id(name: &str) -> DeckId {
    DeckId::top_level(name)
}
