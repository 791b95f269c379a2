//! Vector manager: deterministic symbol id → embedding mapping.
//!
//! The core guarantee: the same (global seed, symbol id) pair always
//! produces the same embedding, on any machine, in any generation order.
//! Each id gets its own ChaCha8 stream seeded from a SHA-256 hash of the
//! global seed and the id, so embeddings are independent of how many
//! were generated before them.

use crate::vector::{BitVector, DEFAULT_DIMENSIONS};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Generates deterministic random embeddings for symbol ids.
#[derive(Clone, Debug)]
pub struct VectorManager {
    dimensions: usize,
    global_seed: u64,
}

impl VectorManager {
    /// Create a manager with the default seed.
    pub fn new(dimensions: usize) -> Self {
        Self::with_seed(dimensions, 0)
    }

    /// Create a manager with a specific global seed.
    ///
    /// The same seed guarantees bit-identical embeddings across runs.
    pub fn with_seed(dimensions: usize, global_seed: u64) -> Self {
        // BitVector::zeros validates the dimensionality contract once here
        let _ = BitVector::zeros(dimensions);
        Self {
            dimensions,
            global_seed,
        }
    }

    /// Get the dimensionality.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Get the global seed.
    pub fn global_seed(&self) -> u64 {
        self.global_seed
    }

    /// Generate the embedding for one symbol id.
    pub fn embedding(&self, id: u32) -> BitVector {
        let mut hasher = Sha256::new();
        hasher.update(self.global_seed.to_le_bytes());
        hasher.update(id.to_le_bytes());
        let hash = hasher.finalize();

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&hash);
        let mut rng = ChaCha8Rng::from_seed(seed);

        let words: Vec<u64> = (0..self.dimensions / 64).map(|_| rng.next_u64()).collect();
        BitVector::from_words(words)
    }

    /// Generate embeddings for ids `0..count`, aligned by id.
    pub fn embedding_table(&self, count: usize) -> Vec<BitVector> {
        (0..count as u32).map(|id| self.embedding(id)).collect()
    }
}

impl Default for VectorManager {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Primitives;

    #[test]
    fn test_deterministic() {
        let a = VectorManager::with_seed(1024, 42);
        let b = VectorManager::with_seed(1024, 42);

        assert_eq!(a.embedding(0), b.embedding(0));
        assert_eq!(a.embedding(300), b.embedding(300));
    }

    #[test]
    fn test_seed_changes_embeddings() {
        let a = VectorManager::with_seed(1024, 1);
        let b = VectorManager::with_seed(1024, 2);

        assert_ne!(a.embedding(0), b.embedding(0));
    }

    #[test]
    fn test_order_independent() {
        let vm = VectorManager::with_seed(1024, 7);
        let late = vm.embedding(50);
        let table = vm.embedding_table(100);

        assert_eq!(table[50], late);
        assert_eq!(table.len(), 100);
    }

    #[test]
    fn test_embeddings_quasi_orthogonal() {
        let vm = VectorManager::with_seed(8192, 0);
        let a = vm.embedding(0);
        let b = vm.embedding(1);

        let d = Primitives::distance(&a, &b);
        assert!((d - 0.5).abs() < 0.05, "got {}", d);
    }
}
