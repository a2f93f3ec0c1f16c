use crate::matrix::EmbeddingMatrix;

pub fn dot(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

/// Cosine similarity; a zero vector on either side scores 0.0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
	let na = dot(a, a).sqrt();
	let nb = dot(b, b).sqrt();
	if na == 0.0 || nb == 0.0 { 0.0 } else { dot(a, b) / (na * nb) }
}

/// Score every row against `query` and keep the `k` best as `(row, score)`.
///
/// The sort is stable, so rows with equal scores stay in matrix order.
pub fn top_k_by_cosine(matrix: &EmbeddingMatrix, query: &[f32], k: usize) -> Vec<(usize, f32)> {
	let qn = dot(query, query).sqrt();
	let mut scored: Vec<(usize, f32)> = (0..matrix.rows())
		.map(|i| {
			let rn = matrix.norm(i);
			let score = if qn == 0.0 || rn == 0.0 { 0.0 } else { dot(query, matrix.row(i)) / (qn * rn) };
			(i, score)
		})
		.collect();
	scored.sort_by(|a, b| b.1.total_cmp(&a.1));
	scored.truncate(k);
	scored
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cosine_ignores_magnitude() {
		assert!((cosine(&[1.0, 0.0], &[5.0, 0.0]) - 1.0).abs() < 1e-6);
		assert!(cosine(&[1.0, 0.0], &[0.0, 3.0]).abs() < 1e-6);
		assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
	}

	#[test]
	fn equal_scores_keep_row_order() {
		let m = EmbeddingMatrix::from_rows(
			vec!["a".into(), "b".into(), "c".into(), "d".into()],
			2,
			&[vec![0.0, 1.0], vec![1.0, 0.0], vec![2.0, 0.0], vec![1.0, 1.0]],
		).unwrap();
		let hits = top_k_by_cosine(&m, &[1.0, 0.0], 4);
		let order: Vec<usize> = hits.iter().map(|h| h.0).collect();
		assert_eq!(order, vec![1, 2, 3, 0]);
	}

	#[test]
	fn zero_query_scores_everything_zero_in_row_order() {
		let m = EmbeddingMatrix::from_rows(vec!["a".into(), "b".into()], 2, &[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
		let hits = top_k_by_cosine(&m, &[0.0, 0.0], 5);
		assert_eq!(hits, vec![(0, 0.0), (1, 0.0)]);
	}
}
