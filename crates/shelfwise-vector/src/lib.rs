//! shelfwise-vector
//!
//! The embedding matrix artifact (Arrow IPC), exhaustive cosine ranking over
//! it, and the recommender that ties the matrix to the catalog and the query
//! encoder.

pub mod matrix;
pub mod schema;
pub mod search;
pub mod writer;

use std::path::Path;
use std::sync::Arc;

use shelfwise_core::config::EmbeddingConfig;
use shelfwise_core::error::{Error, LoadError, Result};
use shelfwise_core::traits::{Embedder, Recommender};
use shelfwise_core::types::Recommendation;
use shelfwise_core::Catalog;
use shelfwise_embed::embedder_from_config;

pub use matrix::EmbeddingMatrix;
pub use writer::write_embedding_matrix;

pub struct EmbeddingRecommender {
    catalog: Arc<Catalog>,
    matrix: EmbeddingMatrix,
    embedder: Box<dyn Embedder>,
}

impl EmbeddingRecommender {
    /// Check that catalog, matrix and encoder describe the same space.
    pub fn new(catalog: Arc<Catalog>, matrix: EmbeddingMatrix, embedder: Box<dyn Embedder>) -> std::result::Result<Self, LoadError> {
        if matrix.rows() != catalog.len() {
            return Err(LoadError::Inconsistent(format!(
                "embedding matrix has {} rows but the metadata table has {} books",
                matrix.rows(),
                catalog.len()
            )));
        }
        if let Some((i, (row_id, book))) = matrix.ids().iter().zip(catalog.iter()).enumerate().find(|(_, (id, b))| **id != b.id) {
            return Err(LoadError::Inconsistent(format!("row {i}: embedding id '{row_id}' does not match book id '{}'", book.id)));
        }
        if embedder.dim() != matrix.dim() {
            return Err(LoadError::Inconsistent(format!(
                "query encoder produces {}-d vectors, embedding matrix is {}-d",
                embedder.dim(),
                matrix.dim()
            )));
        }
        Ok(Self { catalog, matrix, embedder })
    }

    pub fn load(catalog: Arc<Catalog>, embeddings: &Path, config: &EmbeddingConfig) -> std::result::Result<Self, LoadError> {
        let matrix = EmbeddingMatrix::load(embeddings)?;
        let embedder = embedder_from_config(config)?;
        Self::new(catalog, matrix, embedder)
    }
}

impl Recommender for EmbeddingRecommender {
    fn catalog_size(&self) -> usize { self.catalog.len() }

    /// A query that is blank, or that encodes to the zero vector because none of
    /// its tokens survive, yields no recommendations.
    fn recommend(&self, query: &str, top_k: usize) -> Result<Vec<Recommendation>> {
        if top_k == 0 {
            return Err(Error::InvalidArgument("top_k must be at least 1".into()));
        }
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let q_vec = self
            .embedder
            .embed(query)
            .map_err(|e| Error::Operation(format!("query encoding failed: {e:#}")))?;
        if q_vec.len() != self.matrix.dim() {
            return Err(Error::Operation(format!("encoder returned {} values, expected {}", q_vec.len(), self.matrix.dim())));
        }
        if search::dot(&q_vec, &q_vec) == 0.0 {
            tracing::debug!(query, "query has no usable terms");
            return Ok(Vec::new());
        }
        let hits = search::top_k_by_cosine(&self.matrix, &q_vec, top_k);
        tracing::debug!(query, top_k, hits = hits.len(), "recommend");
        Ok(hits
            .into_iter()
            .filter_map(|(i, score)| self.catalog.get(i).map(|book| Recommendation { book: book.clone(), score }))
            .collect())
    }
}
