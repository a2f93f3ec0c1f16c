use arrow_array::cast::AsArray;
use arrow_array::types::Float32Type;
use arrow_array::{Array, FixedSizeListArray, StringArray};
use arrow_ipc::reader::FileReader;
use arrow_schema::DataType;
use std::fs::File;
use std::path::Path;

use shelfwise_core::error::LoadError;

use crate::schema::{ID_COLUMN, VECTOR_COLUMN};

/// Dense row-major `rows × dim` matrix with the row ids it was written with.
///
/// Row norms are computed once at load so ranking only needs dot products.
#[derive(Debug, Clone)]
pub struct EmbeddingMatrix {
    ids: Vec<String>,
    dim: usize,
    data: Vec<f32>,
    norms: Vec<f32>,
}

impl EmbeddingMatrix {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|e| LoadError::io(path, &e))?;
        let reader = FileReader::try_new(file, None).map_err(|e| LoadError::malformed(path, e))?;

        let schema = reader.schema();
        let dim = match schema.field_with_name(VECTOR_COLUMN).map(|f| f.data_type()) {
            Ok(DataType::FixedSizeList(item, n)) if item.data_type() == &DataType::Float32 && *n > 0 => *n as usize,
            Ok(other) => return Err(LoadError::malformed(path, format!("'{VECTOR_COLUMN}' must be FixedSizeList<Float32>, found {other}"))),
            Err(e) => return Err(LoadError::malformed(path, e)),
        };
        match schema.field_with_name(ID_COLUMN).map(|f| f.data_type()) {
            Ok(DataType::Utf8) => {}
            Ok(other) => return Err(LoadError::malformed(path, format!("'{ID_COLUMN}' must be Utf8, found {other}"))),
            Err(e) => return Err(LoadError::malformed(path, e)),
        }

        let mut ids = Vec::new();
        let mut data = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|e| LoadError::malformed(path, e))?;
            let id_col = batch
                .column_by_name(ID_COLUMN)
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| LoadError::malformed(path, "id column missing from batch"))?;
            let vec_col = batch
                .column_by_name(VECTOR_COLUMN)
                .and_then(|c| c.as_any().downcast_ref::<FixedSizeListArray>())
                .ok_or_else(|| LoadError::malformed(path, "vector column missing from batch"))?;
            for i in 0..batch.num_rows() {
                if id_col.is_null(i) || vec_col.is_null(i) {
                    return Err(LoadError::malformed(path, format!("row {} has a null id or vector", ids.len())));
                }
                let row = vec_col.value(i);
                let values = row
                    .as_primitive_opt::<Float32Type>()
                    .filter(|v| v.null_count() == 0 && v.len() == dim)
                    .ok_or_else(|| LoadError::malformed(path, format!("row {} is not {dim} non-null f32 values", ids.len())))?;
                if values.values().iter().any(|x| !x.is_finite()) {
                    return Err(LoadError::malformed(path, format!("row {} contains a non-finite value", ids.len())));
                }
                data.extend_from_slice(values.values());
                ids.push(id_col.value(i).to_string());
            }
        }

        let matrix = Self::from_parts(ids, dim, data);
        tracing::info!(path = %path.display(), rows = matrix.rows(), dim, "loaded embedding matrix");
        Ok(matrix)
    }

    /// Build from in-memory rows. Every row must have `dim` values.
    pub fn from_rows(ids: Vec<String>, dim: usize, rows: &[Vec<f32>]) -> Result<Self, LoadError> {
        if dim == 0 {
            return Err(LoadError::Inconsistent("embedding dimension must be positive".into()));
        }
        if ids.len() != rows.len() {
            return Err(LoadError::Inconsistent(format!("{} ids for {} embedding rows", ids.len(), rows.len())));
        }
        if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != dim) {
            return Err(LoadError::Inconsistent(format!("embedding row {i} has dimension {}, expected {dim}", r.len())));
        }
        Ok(Self::from_parts(ids, dim, rows.concat()))
    }

    fn from_parts(ids: Vec<String>, dim: usize, data: Vec<f32>) -> Self {
        let norms = data.chunks_exact(dim).map(|r| r.iter().map(|x| x * x).sum::<f32>().sqrt()).collect();
        Self { ids, dim, data, norms }
    }

    pub fn rows(&self) -> usize { self.ids.len() }
    pub fn dim(&self) -> usize { self.dim }
    pub fn ids(&self) -> &[String] { &self.ids }
    pub fn row(&self, i: usize) -> &[f32] { &self.data[i * self.dim..(i + 1) * self.dim] }
    pub fn norm(&self, i: usize) -> f32 { self.norms[i] }
}
