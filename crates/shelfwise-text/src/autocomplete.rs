//! Hybrid title autocomplete.
//!
//! Ranking policy, highest first:
//!
//! 1. `Prefix`: the title starts with the query, score `2 + coverage`
//! 2. `Substring`: the title contains the query, score `1 + coverage`
//! 3. `Fuzzy` / `Semantic`: best of word-window edit similarity and TF-IDF
//!    cosine against the title's term row, each gated by its threshold
//!
//! `coverage` is query chars over title chars. Ties fall back to catalog
//! order; titles equal after normalisation are suggested once, first
//! occurrence wins.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tantivy::tokenizer::TextAnalyzer;

use shelfwise_core::config::AutocompleteConfig;
use shelfwise_core::error::LoadError;
use shelfwise_core::traits::Completer;
use shelfwise_core::types::{MatchKind, Suggestion};
use shelfwise_core::Catalog;

use crate::fuzzy::best_window_similarity;
use crate::tantivy_utils::{analyze, build_analyzer};
use crate::term_matrix::{SparseVector, TermMatrix};

pub struct HybridCompleter {
    catalog: Arc<Catalog>,
    /// Normalised titles, as text and as chars.
    titles: Vec<(String, Vec<char>)>,
    matrix: TermMatrix,
    analyzer: TextAnalyzer,
    config: AutocompleteConfig,
}

/// Lowercase and collapse runs of whitespace.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

impl HybridCompleter {
    pub fn new(catalog: Arc<Catalog>, matrix: TermMatrix, config: AutocompleteConfig) -> Result<Self, LoadError> {
        if matrix.rows() != catalog.len() {
            return Err(LoadError::Inconsistent(format!(
                "term matrix has {} rows but the metadata table has {} books",
                matrix.rows(),
                catalog.len()
            )));
        }
        let titles: Vec<(String, Vec<char>)> = catalog
            .iter()
            .map(|b| {
                let t = normalize(&b.title);
                let chars: Vec<char> = t.chars().collect();
                (t, chars)
            })
            .collect();
        let config = AutocompleteConfig { max_suggestions: config.max_suggestions.max(1), ..config };
        Ok(Self { catalog, titles, matrix, analyzer: build_analyzer(), config })
    }

    pub fn load(catalog: Arc<Catalog>, term_matrix: &Path, config: AutocompleteConfig) -> Result<Self, LoadError> {
        let matrix = TermMatrix::load(term_matrix)?;
        Self::new(catalog, matrix, config)
    }

    fn score_title(&self, row: usize, query: &str, query_chars: &[char], semantic: &SparseVector) -> Option<(MatchKind, f32)> {
        let (text, title) = &self.titles[row];
        if title.is_empty() { return None; }
        let coverage = query_chars.len() as f32 / title.len() as f32;
        if text.starts_with(query) { return Some((MatchKind::Prefix, 2.0 + coverage)); }
        if text.contains(query) { return Some((MatchKind::Substring, 1.0 + coverage)); }

        let mut best = None;
        if query_chars.len() >= self.config.min_fuzzy_len {
            let sim = best_window_similarity(query_chars, title);
            if sim >= self.config.fuzzy_threshold { best = Some((MatchKind::Fuzzy, sim)); }
        }
        let cos = self.matrix.cosine_row(semantic, row);
        if cos > 0.0 && cos >= self.config.semantic_threshold && best.map_or(true, |(_, s)| cos > s) {
            best = Some((MatchKind::Semantic, cos));
        }
        best
    }
}

impl Completer for HybridCompleter {
    fn hybrid_autocomplete(&self, query: &str) -> Vec<Suggestion> {
        let q = normalize(query);
        if q.is_empty() { return Vec::new(); }
        let q_chars: Vec<char> = q.chars().collect();
        let semantic = self.matrix.vectorize(&analyze(&self.analyzer, &q));

        let mut candidates: Vec<(MatchKind, f32, usize)> = (0..self.titles.len())
            .filter_map(|row| self.score_title(row, &q, &q_chars, &semantic).map(|(kind, score)| (kind, score, row)))
            .collect();
        candidates.sort_by(|a, b| a.0.tier().cmp(&b.0.tier()).then(b.1.total_cmp(&a.1)).then(a.2.cmp(&b.2)));

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (kind, score, row) in candidates {
            let Some(book) = self.catalog.get(row) else { continue };
            if !seen.insert(self.titles[row].0.as_str()) { continue; }
            out.push(Suggestion { text: book.title.clone(), score, kind });
            if out.len() >= self.config.max_suggestions { break; }
        }
        tracing::debug!(query, suggestions = out.len(), "autocomplete");
        out
    }

    /// Complete the word being typed to the most widespread vocabulary term.
    fn complete_term(&self, query: &str) -> Option<String> {
        if query.is_empty() || query.ends_with(char::is_whitespace) { return None; }
        let lower = query.to_lowercase();
        let fragment = lower.rsplit(|c: char| !c.is_alphanumeric()).next()?;
        if fragment.chars().count() < self.config.min_prediction_len { return None; }
        self.matrix
            .columns_with_prefix(fragment)
            .filter(|&c| self.matrix.term(c) != fragment)
            // first of equally frequent terms wins, and columns arrive in term order
            .min_by_key(|&c| std::cmp::Reverse(self.matrix.doc_freq(c)))
            .map(|c| self.matrix.term(c).to_string())
    }
}
