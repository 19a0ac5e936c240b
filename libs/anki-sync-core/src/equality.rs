//! Pluggable equality policies deciding "same card" and "same deck"
//! across snapshots.
//!
//! The planner and executor take these as injected dependencies so that
//! alternative matching strategies (case-insensitive, fuzzy) can be
//! substituted without touching planning logic.

use crate::types::{Card, CardContent, DeckId};

/// Decides whether two cards denote the same card across snapshots.
pub trait CardEqualityChecker: Send + Sync {
    fn are_equal(&self, a: &Card, b: &Card) -> bool;
}

/// Decides whether two deck identities denote the same deck.
pub trait DeckIdEqualityChecker: Send + Sync {
    fn are_equal(&self, a: &DeckId, b: &DeckId) -> bool;
}

/// Default card identity: exact ordinal matching.
///
/// Question/answer cards are identified by question alone, so an answer
/// edit reads as an update to the same card and the same question found
/// in another deck reads as a move. Cloze cards require the exact text
/// plus the full answers map, compared as an unordered set of pairs.
/// Cards of different variants are never equal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactCardEquality;

impl CardEqualityChecker for ExactCardEquality {
    fn are_equal(&self, a: &Card, b: &Card) -> bool {
        match (&a.content, &b.content) {
            (
                CardContent::QuestionAnswer { question: qa, .. },
                CardContent::QuestionAnswer { question: qb, .. },
            ) => qa == qb,
            (
                CardContent::Cloze {
                    text: ta,
                    answers: aa,
                },
                CardContent::Cloze {
                    text: tb,
                    answers: ab,
                },
            ) => ta == tb && aa == ab,
            _ => false,
        }
    }
}

/// Default deck identity: ordinal name equality plus element-wise,
/// order-sensitive parents equality.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactDeckIdEquality;

impl DeckIdEqualityChecker for ExactDeckIdEquality {
    fn are_equal(&self, a: &DeckId, b: &DeckId) -> bool {
        a.name == b.name && a.parents == b.parents
    }
}

/// Full-content comparison, narrower than identity: also compares answer
/// values. The planner uses this to detect in-place edits once identity
/// has been established.
pub fn content_equal(a: &Card, b: &Card) -> bool {
    match (&a.content, &b.content) {
        (
            CardContent::QuestionAnswer {
                question: qa,
                answer: aa,
            },
            CardContent::QuestionAnswer {
                question: qb,
                answer: ab,
            },
        ) => qa == qb && aa == ab,
        (
            CardContent::Cloze {
                text: ta,
                answers: aa,
            },
            CardContent::Cloze {
                text: tb,
                answers: ab,
            },
        ) => ta == tb && aa == ab,
        _ => false,
    }
}
