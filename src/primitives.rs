//! HDV primitives: the core binary-vector operations.
//!
//! These are the building blocks of the hyperdimensional sequence model:
//! - **bind**: XOR two vectors (self-inverse association)
//! - **rotate**: word-local circular rotation (position encoding)
//! - **distance**: normalized Hamming distance
//! - **compose_query**: rotate-and-bind a sequence of embeddings into
//!   one vector that jointly encodes identity and order
//!
//! # Word-local rotation
//!
//! `rotate` rotates bits within each 64-bit storage word independently;
//! bits never cross word boundaries. This is NOT a whole-vector circular
//! shift. The distinction is invisible to the bundling and query math
//! (rotation only needs to decorrelate a vector from its unrotated self)
//! but it changes every derived bit pattern, so it is preserved as the
//! defined behavior.

use crate::vector::BitVector;

/// Collection of HDV primitive operations.
pub struct Primitives;

impl Primitives {
    /// Bind two vectors (bitwise XOR).
    ///
    /// Binding is commutative, associative and self-inverse:
    /// `bind(bind(a, b), b) == a`. The result is dissimilar to both
    /// inputs, which is what makes it usable as a role/filler pairing.
    pub fn bind(a: &BitVector, b: &BitVector) -> BitVector {
        assert_eq!(
            a.dimensions(),
            b.dimensions(),
            "dimension mismatch in bind"
        );

        let words: Vec<u64> = a
            .words()
            .iter()
            .zip(b.words().iter())
            .map(|(&x, &y)| x ^ y)
            .collect();

        BitVector::from_words(words)
    }

    /// Rotate a vector left by `n` bits, independently within each
    /// storage word.
    ///
    /// `n % 64 == 0` is the identity. Rotating by `k` then by `64 - k`
    /// also restores the input.
    pub fn rotate(v: &BitVector, n: usize) -> BitVector {
        let shift = (n % 64) as u32;
        if shift == 0 {
            return v.clone();
        }

        let words: Vec<u64> = v.words().iter().map(|&w| w.rotate_left(shift)).collect();
        BitVector::from_words(words)
    }

    /// Normalized Hamming distance in `[0, 1]`.
    ///
    /// Symmetric; zero iff the vectors are bit-identical; 0.5 is the
    /// expected distance between two independent random vectors.
    pub fn distance(a: &BitVector, b: &BitVector) -> f32 {
        assert_eq!(
            a.dimensions(),
            b.dimensions(),
            "dimension mismatch in distance"
        );

        let diff: usize = a
            .words()
            .iter()
            .zip(b.words().iter())
            .map(|(&x, &y)| (x ^ y).count_ones() as usize)
            .sum();

        diff as f32 / a.dimensions() as f32
    }

    /// Compose a sequence of embeddings into one query vector.
    ///
    /// The embedding selected by `indices[i]` is rotated by
    /// `indices.len() - 1 - i` (the most distal position gets the largest
    /// rotation, the final position none), then all rotated vectors are
    /// bound together. A trigram `[a, b, c]` composes as
    /// `rotate(e_a, 2) ^ rotate(e_b, 1) ^ e_c`.
    ///
    /// Indices are NOT bounds-checked here; this is the hot path and
    /// callers are expected to hold the invariant that every index names
    /// an embedding.
    pub fn compose_query(embeddings: &[BitVector], indices: &[usize]) -> BitVector {
        assert!(!embeddings.is_empty(), "empty embedding table");
        assert!(!indices.is_empty(), "empty index sequence");

        let mut query = BitVector::zeros(embeddings[0].dimensions());
        for (i, &idx) in indices.iter().enumerate() {
            let rotated = Self::rotate(&embeddings[idx], indices.len() - 1 - i);
            query = Self::bind(&rotated, &query);
        }
        query
    }
}
