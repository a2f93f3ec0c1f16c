//! TF-IDF term matrix in compressed sparse row layout.
//!
//! On disk this is a JSON object:
//!
//! ```json
//! { "vocabulary": ["dragon", ...], "idf": [2.1, ...], "shape": [rows, cols],
//!   "indptr": [0, 3, ...], "indices": [4, 9, 17, ...], "data": [0.41, ...] }
//! ```
//!
//! Row `r` holds the weights `data[indptr[r]..indptr[r + 1]]` at columns
//! `indices[indptr[r]..indptr[r + 1]]`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use shelfwise_core::error::LoadError;

use crate::tantivy_utils::{analyze, build_analyzer};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermMatrixArtifact {
    pub vocabulary: Vec<String>,
    pub idf: Vec<f32>,
    pub shape: [usize; 2],
    pub indptr: Vec<usize>,
    pub indices: Vec<usize>,
    pub data: Vec<f32>,
}

impl TermMatrixArtifact {
    /// Fit a smoothed TF-IDF matrix over `texts`, one row per text, analysed
    /// with [`build_analyzer`]. `idf = ln((1 + n) / (1 + df)) + 1`, rows weight
    /// term counts by idf and are L2 normalised.
    pub fn fit(texts: &[String]) -> Self {
        let analyzer = build_analyzer();
        let docs: Vec<Vec<String>> = texts.iter().map(|t| analyze(&analyzer, t)).collect();
        let vocabulary: Vec<String> = docs.iter().flatten().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        let columns: HashMap<&str, usize> = vocabulary.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();

        let mut df = vec![0usize; vocabulary.len()];
        for d in &docs {
            for t in d.iter().collect::<BTreeSet<_>>() { df[columns[t.as_str()]] += 1; }
        }
        let n = docs.len() as f32;
        let idf: Vec<f32> = df.iter().map(|&d| ((1.0 + n) / (1.0 + d as f32)).ln() + 1.0).collect();

        let (mut indptr, mut indices, mut data) = (vec![0usize], Vec::new(), Vec::new());
        for d in &docs {
            let mut row = SparseVector::new();
            for t in d { *row.entry(columns[t.as_str()]).or_insert(0.0) += 1.0; }
            for (c, w) in row.iter_mut() { *w *= idf[*c]; }
            let norm = row.values().map(|w| w * w).sum::<f32>().sqrt();
            for (c, w) in row {
                indices.push(c);
                data.push(w / norm);
            }
            indptr.push(indices.len());
        }
        Self { shape: [docs.len(), vocabulary.len()], vocabulary, idf, indptr, indices, data }
    }

    fn validate(&self) -> Result<(), String> {
        let [rows, cols] = self.shape;
        if self.vocabulary.len() != cols || self.idf.len() != cols {
            return Err(format!(
                "shape says {cols} columns but vocabulary has {} terms and idf {} weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        if self.indptr.len() != rows + 1 || self.indptr.first() != Some(&0) {
            return Err(format!("indptr must have {} entries starting at 0", rows + 1));
        }
        if self.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err("indptr must be non-decreasing".into());
        }
        let nnz = self.indptr[rows];
        if self.indices.len() != nnz || self.data.len() != nnz {
            return Err(format!("indptr ends at {nnz} but there are {} indices and {} values", self.indices.len(), self.data.len()));
        }
        if let Some(c) = self.indices.iter().find(|&&c| c >= cols) {
            return Err(format!("column index {c} out of range for {cols} columns"));
        }
        if self.idf.iter().chain(&self.data).any(|x| !x.is_finite()) {
            return Err("weights must be finite".into());
        }
        Ok(())
    }
}

/// Sparse query vector keyed by column. Ordered so sums are reproducible.
pub type SparseVector = BTreeMap<usize, f32>;

#[derive(Debug, Clone)]
pub struct TermMatrix {
    vocabulary: Vec<String>,
    columns: HashMap<String, usize>,
    /// Column ids sorted by term, for prefix lookups.
    sorted: Vec<usize>,
    idf: Vec<f32>,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f32>,
    row_norms: Vec<f32>,
    doc_freq: Vec<u32>,
}

impl TermMatrix {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|e| LoadError::io(path, &e))?;
        let artifact: TermMatrixArtifact = serde_json::from_str(&raw).map_err(|e| LoadError::malformed(path, e))?;
        let matrix = Self::from_artifact(artifact).map_err(|reason| LoadError::malformed(path, reason))?;
        tracing::info!(path = %path.display(), rows = matrix.rows(), terms = matrix.cols(), "loaded term matrix");
        Ok(matrix)
    }

    pub fn from_artifact(a: TermMatrixArtifact) -> Result<Self, String> {
        a.validate()?;
        let mut columns = HashMap::with_capacity(a.vocabulary.len());
        for (i, term) in a.vocabulary.iter().enumerate() {
            if columns.insert(term.clone(), i).is_some() {
                return Err(format!("duplicate vocabulary term '{term}'"));
            }
        }
        let mut sorted: Vec<usize> = (0..a.vocabulary.len()).collect();
        sorted.sort_by(|&x, &y| a.vocabulary[x].cmp(&a.vocabulary[y]));

        let mut doc_freq = vec![0u32; a.vocabulary.len()];
        let row_norms = a
            .indptr
            .windows(2)
            .map(|w| {
                for &c in &a.indices[w[0]..w[1]] { doc_freq[c] += 1; }
                a.data[w[0]..w[1]].iter().map(|x| x * x).sum::<f32>().sqrt()
            })
            .collect();

        Ok(Self {
            vocabulary: a.vocabulary,
            columns,
            sorted,
            idf: a.idf,
            indptr: a.indptr,
            indices: a.indices,
            data: a.data,
            row_norms,
            doc_freq,
        })
    }

    pub fn rows(&self) -> usize { self.row_norms.len() }
    pub fn cols(&self) -> usize { self.vocabulary.len() }
    pub fn term(&self, col: usize) -> &str { &self.vocabulary[col] }
    pub fn column(&self, term: &str) -> Option<usize> { self.columns.get(term).copied() }
    /// Number of rows the term occurs in.
    pub fn doc_freq(&self, col: usize) -> u32 { self.doc_freq[col] }

    /// Columns whose term starts with `prefix`, in term order.
    pub fn columns_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = usize> + 'a {
        let start = self.sorted.partition_point(|&c| self.vocabulary[c].as_str() < prefix);
        self.sorted[start..].iter().copied().take_while(move |&c| self.vocabulary[c].starts_with(prefix))
    }

    /// TF-IDF weight the analysed query terms, L2 normalised. Unknown terms are dropped.
    pub fn vectorize(&self, terms: &[String]) -> SparseVector {
        let mut v = SparseVector::new();
        for t in terms {
            if let Some(c) = self.column(t) { *v.entry(c).or_insert(0.0) += self.idf[c]; }
        }
        let norm = v.values().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in v.values_mut() { *x /= norm; } }
        v
    }

    /// Cosine between a normalised query vector and row `row`.
    pub fn cosine_row(&self, query: &SparseVector, row: usize) -> f32 {
        let norm = self.row_norms[row];
        if query.is_empty() || norm == 0.0 { return 0.0; }
        let (lo, hi) = (self.indptr[row], self.indptr[row + 1]);
        let dot: f32 = self.indices[lo..hi]
            .iter()
            .zip(&self.data[lo..hi])
            .filter_map(|(c, w)| query.get(c).map(|q| q * w))
            .sum();
        dot / norm
    }
}
