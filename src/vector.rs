//! Bit vector type for hypertoken.
//!
//! Hypertoken uses dense binary vectors packed into 64-bit words.
//! A vector's value is opaque outside this module except through the
//! operations in [`Primitives`](crate::primitives::Primitives): callers
//! bind, rotate, bundle and compare vectors, never peek at bits directly
//! (the per-bit accessors exist for the accumulator and for tests).

/// Number of bits per storage word.
pub const BITS_PER_WORD: usize = u64::BITS as usize;

/// Default dimensionality (2^13 bits).
pub const DEFAULT_DIMENSIONS: usize = 1 << 13;

/// A high-dimensional binary vector packed into u64 words.
///
/// Dimensionality must be a multiple of 64. Every vector participating in
/// a session must share one dimensionality; mixing is rejected by asserts
/// at the operation seams.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitVector {
    /// Packed bits, least-significant bit of word 0 is dimension 0
    words: Vec<u64>,
    /// Number of bits
    dimensions: usize,
}

impl BitVector {
    /// Create an all-zero vector of the given dimensionality.
    ///
    /// # Panics
    /// Panics if `dimensions` is zero or not a multiple of 64.
    pub fn zeros(dimensions: usize) -> Self {
        assert!(
            dimensions > 0 && dimensions % BITS_PER_WORD == 0,
            "dimensions must be a positive multiple of {}",
            BITS_PER_WORD
        );
        Self {
            words: vec![0; dimensions / BITS_PER_WORD],
            dimensions,
        }
    }

    /// Create a vector from packed words.
    pub fn from_words(words: Vec<u64>) -> Self {
        let dimensions = words.len() * BITS_PER_WORD;
        assert!(dimensions > 0, "vector must have at least one word");
        Self { words, dimensions }
    }

    /// Get the dimensionality.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Get the packed words.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Get mutable access to the packed words.
    pub fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }

    /// Get bit `i` as 0 or 1.
    pub fn bit(&self, i: usize) -> u32 {
        debug_assert!(i < self.dimensions, "bit index out of range");
        ((self.words[i / BITS_PER_WORD] >> (i % BITS_PER_WORD)) & 1) as u32
    }

    /// Set bit `i`.
    pub fn set_bit(&mut self, i: usize) {
        debug_assert!(i < self.dimensions, "bit index out of range");
        self.words[i / BITS_PER_WORD] |= 1u64 << (i % BITS_PER_WORD);
    }

    /// Count set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}
