//! shelfwise-hybrid
//!
//! `BookService` loads the artifact set once and exposes recommendation and
//! autocomplete as read-only capabilities. Each capability keeps its own load
//! outcome: a missing embedding matrix disables `recommend` but leaves
//! `autocomplete` serving, and callers get `Error::Unavailable` rather than a
//! crash.

use std::path::Path;
use std::sync::Arc;

use shelfwise_core::config::{ArtifactPaths, Config, ServiceConfig};
use shelfwise_core::error::{Error, LoadError, Result};
use shelfwise_core::traits::{Completer, Recommender};
use shelfwise_core::types::{AutocompleteResponse, Readiness, Recommendation, Status, Suggestion};
use shelfwise_core::Catalog;
use shelfwise_text::HybridCompleter;
use shelfwise_vector::EmbeddingRecommender;

pub struct BookService {
    recommender: std::result::Result<Box<dyn Recommender>, LoadError>,
    completer: std::result::Result<Box<dyn Completer>, LoadError>,
    default_top_k: usize,
}

impl BookService {
    pub fn new(
        recommender: std::result::Result<Box<dyn Recommender>, LoadError>,
        completer: std::result::Result<Box<dyn Completer>, LoadError>,
        default_top_k: usize,
    ) -> Self {
        Self { recommender, completer, default_top_k: default_top_k.max(1) }
    }

    /// Read configuration from `config` and load artifacts relative to its base directory.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let service = config.service()?;
        Ok(Self::start(&service, config.base_dir()))
    }

    /// Load every artifact. Never fails; check `readiness()` for the outcome.
    pub fn start(config: &ServiceConfig, base_dir: &Path) -> Self {
        Self::start_with_paths(config, &config.artifacts.paths(base_dir))
    }

    pub fn start_with_paths(config: &ServiceConfig, paths: &ArtifactPaths) -> Self {
        let catalog = Catalog::load(&paths.metadata).map(Arc::new);

        let recommender = catalog
            .clone()
            .and_then(|c| EmbeddingRecommender::load(c, &paths.embeddings, &config.embedding))
            .map(|r| Box::new(r) as Box<dyn Recommender>);
        let completer = catalog
            .and_then(|c| HybridCompleter::load(c, &paths.term_matrix, config.autocomplete.clone()))
            .map(|c| Box::new(c) as Box<dyn Completer>);

        match &recommender {
            Ok(r) => tracing::info!(books = r.catalog_size(), "recommend ready"),
            Err(e) => tracing::error!(error = %e, "recommend unavailable"),
        }
        match &completer {
            Ok(_) => tracing::info!("autocomplete ready"),
            Err(e) => tracing::error!(error = %e, "autocomplete unavailable"),
        }

        Self::new(recommender, completer, config.recommend.default_top_k)
    }

    pub fn readiness(&self) -> Readiness {
        fn status<T>(r: &std::result::Result<T, LoadError>) -> Status {
            match r {
                Ok(_) => Status::Ready,
                Err(e) => Status::Unavailable { reason: e.to_string() },
            }
        }
        Readiness { recommend: status(&self.recommender), autocomplete: status(&self.completer) }
    }

    /// `top_k` defaults to the configured value when not given.
    pub fn recommend(&self, query: &str, top_k: Option<usize>) -> Result<Vec<Recommendation>> {
        let recommender = self.recommender.as_ref().map_err(|e| Error::Unavailable(e.to_string()))?;
        recommender.recommend(query, top_k.unwrap_or(self.default_top_k))
    }

    pub fn suggest(&self, query: &str) -> Result<Vec<Suggestion>> {
        Ok(self.completer()?.hybrid_autocomplete(query))
    }

    pub fn autocomplete(&self, query: &str) -> Result<AutocompleteResponse> {
        let completer = self.completer()?;
        let matches = completer.hybrid_autocomplete(query).into_iter().map(|s| s.text).collect();
        Ok(AutocompleteResponse { matches, prediction: completer.complete_term(query) })
    }

    fn completer(&self) -> Result<&dyn Completer> {
        self.completer.as_deref().map_err(|e| Error::Unavailable(e.to_string()))
    }
}
