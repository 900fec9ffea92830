//! Exact in-memory vector index.
//!
//! A flat table of equally sized vectors searched by brute force with
//! squared Euclidean distance. Built once from a slice of embeddings and
//! never mutated afterwards.
use crate::error::{RagError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub position: usize,
    pub distance: f32,
}

#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

/// Squared L2 distance. Callers guarantee equal lengths.
pub fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

impl FlatIndex {
    /// Build an index over `embeddings`. The first vector fixes the
    /// dimensionality every other vector must share.
    pub fn build(embeddings: Vec<Vec<f32>>) -> Result<Self> {
        let dimensions = match embeddings.first() {
            Some(first) => first.len(),
            None => return Err(RagError::EmptyCorpus),
        };

        if let Some(bad) = embeddings.iter().find(|v| v.len() != dimensions) {
            return Err(RagError::DimensionMismatch {
                expected: dimensions,
                actual: bad.len(),
            });
        }

        Ok(Self {
            dimensions,
            vectors: embeddings,
        })
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Return the `top_k` nearest vectors, nearest first. Equal distances
    /// keep ascending position order. Asking for more results than the
    /// index holds returns every entry.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if top_k == 0 {
            return Err(RagError::InvalidArgument(
                "top_k must be at least 1".to_string(),
            ));
        }
        if query.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let mut results: Vec<SearchResult> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| SearchResult {
                position,
                distance: euclidean_distance_squared(query, v),
            })
            .collect();

        // Stable sort: ties stay in position order.
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(top_k);

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> FlatIndex {
        FlatIndex::build(vec![
            vec![0.0, 0.0],
            vec![3.0, 4.0],
            vec![1.0, 1.0],
            vec![-1.0, -1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_distance_squared() {
        assert_eq!(euclidean_distance_squared(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(euclidean_distance_squared(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = sample_index();
        let results = index.search(&[0.9, 0.9], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].position, 2);
        assert_eq!(results[1].position, 0);
        assert!(results[0].distance <= results[1].distance);
    }

    #[test]
    fn test_search_ties_by_position() {
        let index = sample_index();
        // (1,1) and (-1,-1) are equidistant from the origin.
        let results = index.search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = results.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 2, 3]);
        assert_eq!(results[1].distance, results[2].distance);
    }

    #[test]
    fn test_search_k_larger_than_index() {
        let index = sample_index();
        let results = index.search(&[5.0, 5.0], 10).unwrap();
        assert_eq!(results.len(), index.len());
        for pair in results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_search_is_repeatable() {
        let index = sample_index();
        let a = index.search(&[0.5, -0.2], 3).unwrap();
        let b = index.search(&[0.5, -0.2], 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_search_zero_k() {
        let index = sample_index();
        assert!(matches!(
            index.search(&[0.0, 0.0], 0),
            Err(RagError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_search_query_dimension_mismatch() {
        let index = sample_index();
        let err = index.search(&[0.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_build_dimension_mismatch() {
        let err = FlatIndex::build(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_build_empty() {
        assert!(matches!(FlatIndex::build(vec![]), Err(RagError::EmptyCorpus)));
    }

    #[test]
    fn test_build_reports_shape() {
        let index = sample_index();
        assert_eq!(index.dimensions(), 2);
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());
    }
}
