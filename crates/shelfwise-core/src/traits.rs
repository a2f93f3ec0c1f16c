use crate::error::Result;
use crate::types::{Recommendation, Suggestion};

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("encoder returned no vector"))
    }
}

pub trait Recommender: Send + Sync {
    /// Number of books the recommender ranks over.
    fn catalog_size(&self) -> usize;
    fn recommend(&self, query: &str, top_k: usize) -> Result<Vec<Recommendation>>;
}

pub trait Completer: Send + Sync {
    fn hybrid_autocomplete(&self, query: &str) -> Vec<Suggestion>;
    fn complete_term(&self, query: &str) -> Option<String>;
}
