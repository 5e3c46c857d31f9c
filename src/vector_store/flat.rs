//! Exact brute-force cosine search.

use super::{cosine_similarity, SimilaritySearch};

/// Flat index scoring every vector against the query.
///
/// Fine for the few hundred chunks of a single video transcript.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(vectors: Vec<Vec<f32>>) -> Self {
        Self { vectors }
    }
}

impl SimilaritySearch for FlatIndex {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn nearest(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| {
                let score = cosine_similarity(query, vector);
                // NaN from a malformed vector ranks last.
                (position, if score.is_nan() { f32::NEG_INFINITY } else { score })
            })
            .collect();

        // Stable sort: equal scores keep their original order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_orders_by_score() {
        let index = FlatIndex::new(vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.7, 0.7]]);
        let results = index.nearest(&[1.0, 0.0], 2);

        assert_eq!(results.iter().map(|r| r.0).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let index = FlatIndex::new(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0]]);
        let results = index.nearest(&[1.0, 0.0], 3);

        assert_eq!(results.iter().map(|r| r.0).collect::<Vec<_>>(), vec![0, 2, 3]);
    }

    #[test]
    fn test_nan_vectors_rank_last() {
        let vectors: Vec<Vec<f32>> = (0..40)
            .map(|i| if i % 3 == 0 { vec![f32::NAN, 1.0] } else { vec![1.0, i as f32 / 40.0] })
            .collect();
        let index = FlatIndex::new(vectors);

        let results = index.nearest(&[1.0, 0.0], 3);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|(position, score)| position % 3 != 0 && score.is_finite()));

        let all = index.nearest(&[1.0, 0.0], 40);
        assert!(all[26..].iter().all(|(position, _)| position % 3 == 0));
    }

    #[test]
    fn test_k_larger_than_index() {
        let index = FlatIndex::new(vec![vec![1.0], vec![0.5]]);
        assert_eq!(index.nearest(&[1.0], 3).len(), 2);
        assert!(FlatIndex::default().nearest(&[1.0], 3).is_empty());
        assert!(FlatIndex::default().is_empty());
    }
}
