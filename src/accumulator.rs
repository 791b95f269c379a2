//! Accumulator: majority-vote bundling over a corpus pass.
//!
//! Bundling many vectors by pairwise XOR would destroy the signal; the
//! accumulator instead keeps one occurrence counter per dimension and
//! collapses to a single vector at the end. A bit survives the collapse
//! only if enough contributing vectors voted for it, so patterns seen
//! often dominate the result and one-off noise cancels out.

use crate::vector::BitVector;

/// A per-dimension counting accumulator for bundling bit vectors.
#[derive(Clone, Debug)]
pub struct Accumulator {
    /// One occurrence counter per dimension
    counts: Vec<u32>,
    /// Number of vectors accumulated
    count: usize,
}

impl Accumulator {
    /// Create a new empty accumulator.
    pub fn new(dimensions: usize) -> Self {
        Self {
            counts: vec![0; dimensions],
            count: 0,
        }
    }

    /// Get the dimensionality.
    pub fn dimensions(&self) -> usize {
        self.counts.len()
    }

    /// Get the number of accumulated vectors.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Add a vector: each dimension's counter is incremented by that
    /// vector's bit (0 or 1).
    pub fn add(&mut self, vector: &BitVector) {
        assert_eq!(
            self.dimensions(),
            vector.dimensions(),
            "dimension mismatch in accumulator"
        );

        for i in 0..self.counts.len() {
            self.counts[i] += vector.bit(i);
        }
        self.count += 1;
    }

    /// Collapse the counters into a vector: bit `i` is set iff its
    /// counter strictly exceeds `threshold`.
    ///
    /// With K contributed vectors, `threshold = K / 2` is a majority
    /// vote and `threshold = 0` yields the bitwise OR of all K.
    pub fn collapse(&self, threshold: u32) -> BitVector {
        let mut out = BitVector::zeros(self.dimensions());
        for (i, &c) in self.counts.iter().enumerate() {
            if c > threshold {
                out.set_bit(i);
            }
        }
        out
    }

    /// Get the raw counters.
    pub fn raw_counts(&self) -> &[u32] {
        &self.counts
    }

    /// Merge another accumulator into this one.
    pub fn merge(&mut self, other: &Accumulator) {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "dimension mismatch in accumulator merge"
        );

        for (i, &c) in other.counts.iter().enumerate() {
            self.counts[i] += c;
        }
        self.count += other.count;
    }

    /// Clear the accumulator to start fresh.
    pub fn clear(&mut self) {
        self.counts.fill(0);
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_basic() {
        let mut acc = Accumulator::new(128);
        assert_eq!(acc.count(), 0);

        let v = BitVector::from_words(vec![0b101, 0]);
        acc.add(&v);

        assert_eq!(acc.count(), 1);
        assert_eq!(acc.raw_counts()[0], 1);
        assert_eq!(acc.raw_counts()[1], 0);
        assert_eq!(acc.raw_counts()[2], 1);
    }

    #[test]
    fn test_collapse_majority() {
        let mut acc = Accumulator::new(128);

        let common = BitVector::from_words(vec![0b011, 0]);
        let rare = BitVector::from_words(vec![0b100, 0]);

        for _ in 0..3 {
            acc.add(&common);
        }
        acc.add(&rare);

        // counts: bit0 = 3, bit1 = 3, bit2 = 1; majority over 4 is > 2
        let v = acc.collapse(acc.count() as u32 / 2);
        assert_eq!(v.bit(0), 1);
        assert_eq!(v.bit(1), 1);
        assert_eq!(v.bit(2), 0);
    }

    #[test]
    fn test_collapse_threshold_zero_is_or() {
        let mut acc = Accumulator::new(128);
        acc.add(&BitVector::from_words(vec![0b001, 0]));
        acc.add(&BitVector::from_words(vec![0b010, 0]));
        acc.add(&BitVector::from_words(vec![0b100, 1]));

        let v = acc.collapse(0);
        assert_eq!(v.words(), &[0b111, 1]);
    }

    #[test]
    fn test_collapse_strictness() {
        let mut acc = Accumulator::new(64);
        acc.add(&BitVector::from_words(vec![1]));
        acc.add(&BitVector::from_words(vec![1]));

        // counter is exactly 2: not strictly above 2
        assert_eq!(acc.collapse(2).bit(0), 0);
        assert_eq!(acc.collapse(1).bit(0), 1);
    }

    #[test]
    fn test_merge() {
        let mut a = Accumulator::new(64);
        let mut b = Accumulator::new(64);
        a.add(&BitVector::from_words(vec![0b01]));
        b.add(&BitVector::from_words(vec![0b11]));

        a.merge(&b);
        assert_eq!(a.count(), 2);
        assert_eq!(a.raw_counts()[0], 2);
        assert_eq!(a.raw_counts()[1], 1);
    }

    #[test]
    fn test_clear() {
        let mut acc = Accumulator::new(64);
        acc.add(&BitVector::from_words(vec![u64::MAX]));
        acc.clear();
        assert_eq!(acc.count(), 0);
        assert!(acc.raw_counts().iter().all(|&c| c == 0));
    }
}
