//! shelfwise-text
//!
//! Lexical side of the service: tantivy text analysis, the TF-IDF term matrix
//! artifact, edit-distance matching and the hybrid title completer.

pub mod autocomplete;
pub mod fuzzy;
pub mod tantivy_utils;
pub mod term_matrix;

pub use autocomplete::HybridCompleter;
pub use term_matrix::{TermMatrix, TermMatrixArtifact};
