//! Query encoders.
//!
//! The recommender compares query vectors against an embedding matrix that was
//! built offline, so the encoder chosen here must be the one the artifacts
//! were produced with. `HashingEmbedder` is dependency-free and deterministic;
//! `BgeM3Embedder` (feature `bge`) runs the transformer model through candle.

use anyhow::Result;
use std::hash::Hasher;
use twox_hash::XxHash64;

use shelfwise_core::config::{EmbeddingConfig, EncoderKind};
use shelfwise_core::error::LoadError;
use shelfwise_core::traits::Embedder;

#[cfg(feature = "bge")]
mod bge;
#[cfg(feature = "bge")]
pub mod device;
#[cfg(feature = "bge")]
pub mod pool;
#[cfg(feature = "bge")]
pub mod tokenize;

#[cfg(feature = "bge")]
pub use bge::BgeM3Embedder;
#[cfg(feature = "bge")]
pub use pool::masked_mean_l2;

/// Signed feature hashing of lowercased alphanumeric tokens, L2 normalised.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
    seed: u64,
}

impl HashingEmbedder {
    const MAX_TOKENS: usize = 4096;

    pub fn new(dim: usize, seed: u64) -> Self { Self { dim: dim.max(1), seed } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let lower = text.to_lowercase();
        for token in lower.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()).take(Self::MAX_TOKENS) {
            let mut hasher = XxHash64::with_seed(self.seed);
            hasher.write(token.as_bytes());
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { Self::MAX_TOKENS }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Build the query encoder named in the configuration.
pub fn embedder_from_config(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>, LoadError> {
    match config.encoder {
        EncoderKind::Hashing => {
            tracing::debug!(dim = config.dimension, seed = config.seed, "using hashing encoder");
            Ok(Box::new(HashingEmbedder::new(config.dimension, config.seed)))
        }
        EncoderKind::BgeM3 => load_bge(config),
    }
}

#[cfg(feature = "bge")]
fn load_bge(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>, LoadError> {
    let dir = bge::resolve_model_dir(config.model_dir.as_deref()).map_err(|e| LoadError::Encoder(e.to_string()))?;
    let model = BgeM3Embedder::load(&dir).map_err(|e| LoadError::Encoder(format!("{e:#}")))?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "bge"))]
fn load_bge(_config: &EmbeddingConfig) -> Result<Box<dyn Embedder>, LoadError> {
    Err(LoadError::Encoder("bge-m3 requires shelfwise-embed to be built with the `bge` feature".to_string()))
}
