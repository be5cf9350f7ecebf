//! Similarity ranking over a per-request flat index
//!
//! Exact nearest-neighbour search by squared Euclidean distance. The index is
//! built from the current request's passages and dropped with it; there is no
//! persistence, incremental update or deletion.

use crate::RagError;

/// A ranked passage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the passage in insertion order
    pub index: usize,
    /// Squared L2 distance to the query
    pub distance: f32,
}

/// Squared Euclidean distance. Callers guarantee equal lengths.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Flat (brute-force) L2 index
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: Vec::new(),
        }
    }

    /// Build an index from passage vectors; the dimension is taken from the first
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Result<Self, RagError> {
        let dim = vectors.first().map(Vec::len).unwrap_or(0);
        let mut index = Self::new(dim);
        index.add_all(vectors)?;
        Ok(index)
    }

    pub fn add(&mut self, vector: Vec<f32>) -> Result<(), RagError> {
        if vector.len() != self.dim {
            return Err(RagError::Index(format!(
                "Vector dimension {} does not match index dimension {}",
                vector.len(),
                self.dim
            )));
        }
        self.vectors.push(vector);
        Ok(())
    }

    pub fn add_all(&mut self, vectors: Vec<Vec<f32>>) -> Result<(), RagError> {
        for vector in vectors {
            self.add(vector)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the `k` nearest vectors, nearest first.
    ///
    /// `k` is clamped to the index size. Equal distances keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, RagError> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if query.len() != self.dim {
            return Err(RagError::Index(format!(
                "Query dimension {} does not match index dimension {}",
                query.len(),
                self.dim
            )));
        }

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, v)| Neighbor {
                index,
                distance: squared_l2(query, v),
            })
            .collect();

        // stable sort: ties stay in insertion order
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k.min(self.len()));

        Ok(neighbors)
    }
}

/// Rank passages against a query vector, returning the indices of the `k`
/// nearest passages, nearest first.
pub fn rank(query: &[f32], passages: &[Vec<f32>], k: usize) -> Result<Vec<usize>, RagError> {
    if passages.is_empty() {
        return Ok(Vec::new());
    }

    let index = FlatL2Index::from_vectors(passages.to_vec())?;
    Ok(index
        .search(query, k)?
        .into_iter()
        .map(|n| n.index)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EmbeddingConfig, HashEmbedder};

    fn passages() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![5.0, 5.0],
            vec![0.9, 1.1],
        ]
    }

    #[test]
    fn test_squared_l2() {
        assert_eq!(squared_l2(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_l2(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_exact_match_ranks_first_with_zero_distance() {
        let index = FlatL2Index::from_vectors(passages()).unwrap();
        let results = index.search(&[5.0, 5.0], 2).unwrap();

        assert_eq!(results[0].index, 2);
        assert_eq!(results[0].distance, 0.0);
    }

    #[test]
    fn test_results_ascending_by_distance() {
        let index = FlatL2Index::from_vectors(passages()).unwrap();
        let results = index.search(&[1.0, 1.0], 4).unwrap();

        let order: Vec<usize> = results.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_ties_keep_original_order() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]];
        let ranked = rank(&[0.0, 0.0], &vectors, 3).unwrap();
        assert_eq!(ranked, vec![0, 1, 2]);
    }

    #[test]
    fn test_k_clamped_to_passage_count() {
        let ranked = rank(&[0.0, 0.0], &passages()[..1], 2).unwrap();
        assert_eq!(ranked, vec![0]);
    }

    #[test]
    fn test_empty_passages() {
        assert!(rank(&[0.0, 0.0], &[], 2).unwrap().is_empty());
        assert!(FlatL2Index::new(2).search(&[0.0, 0.0], 2).unwrap().is_empty());
    }

    #[test]
    fn test_zero_k() {
        assert!(rank(&[0.0, 0.0], &passages(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut index = FlatL2Index::new(2);
        assert!(index.add(vec![1.0, 2.0, 3.0]).is_err());

        let index = FlatL2Index::from_vectors(passages()).unwrap();
        assert!(matches!(index.search(&[1.0], 1), Err(RagError::Index(_))));

        assert!(FlatL2Index::from_vectors(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_reflexive_nearest_neighbor() {
        let embedder = HashEmbedder::new(EmbeddingConfig::default());
        let texts = ["Brihadeeswarar Temple", "Meenakshi Amman", "Kallanai dam"];
        let vectors: Vec<Vec<f32>> = texts.iter().map(|t| embedder.embed_one(t)).collect();

        let query = embedder.embed_one(texts[0]);
        assert_eq!(rank(&query, &vectors, 1).unwrap(), vec![0]);
    }
}
