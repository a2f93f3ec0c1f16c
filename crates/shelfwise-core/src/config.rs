//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nesting, e.g. `APP_RECOMMEND__DEFAULT_TOP_K=10`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment, base_dir: dir.to_path_buf() })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract and validate the full service configuration.
    pub fn service(&self) -> anyhow::Result<ServiceConfig> {
        let config: ServiceConfig = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract service config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Directory relative artifact paths are resolved against.
    pub fn base_dir(&self) -> &Path { &self.base_dir }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub artifacts: ArtifactConfig,
    pub embedding: EmbeddingConfig,
    pub recommend: RecommendConfig,
    pub autocomplete: AutocompleteConfig,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.embedding.dimension == 0 {
            return Err(Error::InvalidConfig("embedding.dimension must be positive".into()));
        }
        if self.recommend.default_top_k == 0 {
            return Err(Error::InvalidConfig("recommend.default_top_k must be positive".into()));
        }
        if self.autocomplete.max_suggestions == 0 {
            return Err(Error::InvalidConfig("autocomplete.max_suggestions must be positive".into()));
        }
        for (name, value) in [
            ("autocomplete.fuzzy_threshold", self.autocomplete.fuzzy_threshold),
            ("autocomplete.semantic_threshold", self.autocomplete.semantic_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub dir: String,
    pub embeddings: String,
    pub term_matrix: String,
    pub metadata: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: "artifacts".to_string(),
            embeddings: "book_embeddings.arrow".to_string(),
            term_matrix: "tfidf_matrix.json".to_string(),
            metadata: "books.json".to_string(),
        }
    }
}

impl ArtifactConfig {
    pub fn paths(&self, base: &Path) -> ArtifactPaths {
        let dir = resolve_with_base(base, &self.dir);
        ArtifactPaths {
            embeddings: resolve_with_base(&dir, &self.embeddings),
            term_matrix: resolve_with_base(&dir, &self.term_matrix),
            metadata: resolve_with_base(&dir, &self.metadata),
        }
    }
}

/// Fully resolved artifact locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub embeddings: PathBuf,
    pub term_matrix: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let names = ArtifactConfig::default();
        Self {
            embeddings: dir.join(names.embeddings),
            term_matrix: dir.join(names.term_matrix),
            metadata: dir.join(names.metadata),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncoderKind {
    Hashing,
    BgeM3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub encoder: EncoderKind,
    pub dimension: usize,
    pub seed: u64,
    pub model_dir: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { encoder: EncoderKind::Hashing, dimension: 384, seed: 0, model_dir: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub default_top_k: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self { Self { default_top_k: 5 } }
}

/// Ranking policy knobs for the hybrid completer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    pub max_suggestions: usize,
    /// Queries shorter than this (in chars) skip edit-distance matching.
    pub min_fuzzy_len: usize,
    pub fuzzy_threshold: f32,
    pub semantic_threshold: f32,
    pub min_prediction_len: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 10,
            min_fuzzy_len: 3,
            fuzzy_threshold: 0.7,
            semantic_threshold: 0.25,
            min_prediction_len: 2,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
