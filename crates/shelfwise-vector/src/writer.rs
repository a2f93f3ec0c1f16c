//! Arrow IPC writer for embedding matrices.
//!
//! Serving never writes; this exists so tools and tests can produce files in
//! exactly the layout `EmbeddingMatrix::load` expects.

use anyhow::{ensure, Result};
use arrow_array::{FixedSizeListArray, RecordBatch, StringArray};
use arrow_array::types::Float32Type;
use arrow_ipc::writer::FileWriter;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::schema::build_embedding_schema;

pub fn write_embedding_matrix(path: &Path, dim: usize, ids: &[String], vectors: &[Vec<f32>]) -> Result<()> {
	ensure!(ids.len() == vectors.len(), "ids ({}) and vectors ({}) length must match", ids.len(), vectors.len());
	ensure!(dim > 0, "dimension must be positive");
	for (id, v) in ids.iter().zip(vectors) { ensure!(v.len() == dim, "vector for '{}' has {} values, expected {}", id, v.len(), dim); }
	let dim = i32::try_from(dim)?;
	let schema = build_embedding_schema(dim);
	let batch = RecordBatch::try_new(schema.clone(), vec![
		Arc::new(StringArray::from(ids.to_vec())),
		Arc::new(FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(vectors.iter().map(|v| Some(v.iter().copied().map(Some))), dim)),
	])?;
	let mut writer = FileWriter::try_new(File::create(path)?, &schema)?;
	writer.write(&batch)?;
	writer.finish()?;
	Ok(())
}
