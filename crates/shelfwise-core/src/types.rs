//! Domain types shared by the recommender, the completer and the service facade.

use serde::{Deserialize, Serialize};

pub type BookId = String;

/// One row of the metadata table.
///
/// - `id`: stable identifier, unique within the catalog
/// - `title`: display title, also the autocomplete candidate text
/// - `description`: free text the offline artifacts were built from
/// - `authors`/`publication_year`/`language`: optional display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub language: Option<String>,
}

/// A recommended book and its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub book: BookRecord,
    pub score: f32,
}

/// How a suggestion matched the typed text. Declaration order is rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Prefix,
    Substring,
    Fuzzy,
    Semantic,
}

impl MatchKind {
    /// Lexical kinds rank above everything else; fuzzy and semantic share a tier.
    pub fn tier(self) -> u8 {
        match self {
            MatchKind::Prefix => 0,
            MatchKind::Substring => 1,
            MatchKind::Fuzzy | MatchKind::Semantic => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub text: String,
    pub score: f32,
    pub kind: MatchKind,
}

/// What the service hands back for a partial query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutocompleteResponse {
    pub matches: Vec<String>,
    pub prediction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    Ready,
    Unavailable { reason: String },
}

impl Status {
    pub fn is_ready(&self) -> bool { matches!(self, Status::Ready) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readiness {
    pub recommend: Status,
    pub autocomplete: Status,
}

impl Readiness {
    pub fn is_ready(&self) -> bool { self.recommend.is_ready() && self.autocomplete.is_ready() }
}
