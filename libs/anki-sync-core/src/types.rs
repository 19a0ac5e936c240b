//! Core types shared between the source and existing deck snapshots.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the remote store's always-present default deck.
///
/// The default deck cannot be deleted remotely, so the planner never
/// schedules it for deletion.
pub const DEFAULT_DECK_NAME: &str = "Default";

/// Identity of a deck within the collection hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckId {
    /// The deck's own leaf label.
    pub name: String,
    /// Ancestor labels, root-first. Empty for top-level decks.
    #[serde(default)]
    pub parents: Vec<String>,
}

impl DeckId {
    pub fn new(name: impl Into<String>, parents: Vec<String>) -> Self {
        Self {
            name: name.into(),
            parents,
        }
    }

    /// A top-level deck with no ancestors.
    pub fn top_level(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Identity of the remote store's reserved default deck.
    pub fn default_deck() -> Self {
        Self::top_level(DEFAULT_DECK_NAME)
    }

    pub fn is_default(&self) -> bool {
        self.parents.is_empty() && self.name == DEFAULT_DECK_NAME
    }

    /// Full lineage, root-first, ending with the deck's own name.
    pub fn path(&self) -> Vec<&str> {
        self.parents
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect()
    }

    /// Whether `self` is a proper ancestor of `other`, judged by full-path
    /// prefix containment.
    pub fn is_ancestor_of(&self, other: &DeckId) -> bool {
        let mine = self.path();
        let theirs = other.path();
        theirs.len() > mine.len() && theirs[..mine.len()] == mine[..]
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().join("::"))
    }
}

/// The two kinds of card content the collection supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardContent {
    QuestionAnswer {
        question: String,
        answer: String,
    },
    /// `text` contains named placeholders of the form `{name}`; `answers`
    /// maps each placeholder name to its answer text.
    Cloze {
        text: String,
        answers: HashMap<String, String>,
    },
}

impl CardContent {
    /// The text that names this card in instruction keys and log lines:
    /// the question for question/answer cards, the full text for cloze.
    pub fn identity_key(&self) -> &str {
        match self {
            Self::QuestionAnswer { question, .. } => question,
            Self::Cloze { text, .. } => text,
        }
    }
}

/// A single flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Assigned by the remote store on first upsert; `None` until then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<i64>,
    /// Tie-breaker hint for change detection, never primary identity.
    pub date_modified: DateTime<Utc>,
    pub content: CardContent,
}

impl Card {
    pub fn question_answer(
        question: impl Into<String>,
        answer: impl Into<String>,
        date_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            remote_id: None,
            date_modified,
            content: CardContent::QuestionAnswer {
                question: question.into(),
                answer: answer.into(),
            },
        }
    }

    pub fn cloze(
        text: impl Into<String>,
        answers: HashMap<String, String>,
        date_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            remote_id: None,
            date_modified,
            content: CardContent::Cloze {
                text: text.into(),
                answers,
            },
        }
    }

    pub fn identity_key(&self) -> &str {
        self.content.identity_key()
    }
}

/// A deck snapshot: identity plus the cards it holds. Card order carries
/// no meaning for reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(id: DeckId, cards: Vec<Card>) -> Self {
        Self { id, cards }
    }

    pub fn empty(id: DeckId) -> Self {
        Self::new(id, Vec::new())
    }
}
