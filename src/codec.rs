//! Byte-pair codec: merge-dictionary construction and application.
//!
//! The dictionary is an arena of integer-indexed entries. Ids 0–255 are
//! literal byte leaves; every later entry merges two earlier ids, so the
//! table is a forest of strictly-increasing-id binary trees. No entry is
//! ever edited after creation and the table only grows by appending,
//! which makes an id a permanent name for one byte string.
//!
//! Encoding has two modes:
//! - **learn** (`min_frequency > 0`): repeatedly merge the most frequent
//!   adjacent pair into a fresh entry until its frequency falls to the
//!   threshold;
//! - **replay** (`min_frequency == 0`): apply an already-learned table to
//!   new bytes without growing it.

use crate::error::{HyperTokenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

/// Index of a dictionary entry.
pub type SymbolId = u32;

/// Number of literal leaf entries seeded into every dictionary.
pub const LEAF_COUNT: usize = 256;

/// One dictionary entry.
///
/// Entries with ids below [`LEAF_COUNT`] are leaves whose `left` holds
/// the literal byte value (and `right` is 0); every later entry is a
/// merge whose fields are child ids strictly smaller than its own id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub left: SymbolId,
    pub right: SymbolId,
}

/// Append-only byte-pair merge dictionary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dictionary {
    entries: Vec<Symbol>,
}

impl Dictionary {
    /// Create a dictionary holding only the 256 literal leaves.
    pub fn new() -> Self {
        let entries = (0..LEAF_COUNT as SymbolId)
            .map(|b| Symbol { left: b, right: 0 })
            .collect();
        Self { entries }
    }

    /// Number of entries (leaves + merges).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True iff the dictionary holds only the initial leaves.
    pub fn is_empty(&self) -> bool {
        self.entries.len() == LEAF_COUNT
    }

    /// Checked entry lookup.
    pub fn get(&self, id: SymbolId) -> Result<Symbol> {
        self.entries
            .get(id as usize)
            .copied()
            .ok_or(HyperTokenError::UnknownSymbol {
                id,
                len: self.entries.len(),
            })
    }

    /// All entries, indexed by id.
    pub fn entries(&self) -> &[Symbol] {
        &self.entries
    }

    /// Encode a byte corpus into a symbol-id sequence.
    ///
    /// With `min_frequency > 0` the dictionary learns: each round counts
    /// every adjacent pair (overlapping occurrences included), appends
    /// the most frequent one as a new entry and rewrites the sequence;
    /// the loop continues while the just-merged pair's frequency strictly
    /// exceeds `min_frequency`. Ties go to the first-seen pair.
    ///
    /// With `min_frequency == 0` no entry is added; every merge entry
    /// beyond the leaves is replayed over the freshly seeded sequence in
    /// dictionary order, which reproduces a learn-mode encoding of the
    /// corpus the table was learned from.
    pub fn encode(&mut self, corpus: &[u8], min_frequency: usize) -> Vec<SymbolId> {
        let mut encoded: Vec<SymbolId> = corpus.iter().map(|&b| b as SymbolId).collect();

        if min_frequency > 0 {
            while let Some((pair, freq)) = most_frequent_pair(&encoded) {
                let id = self.entries.len() as SymbolId;
                self.entries.push(pair);
                replace_pair(&mut encoded, pair, id);
                if freq <= min_frequency {
                    break;
                }
            }
        } else {
            for id in LEAF_COUNT..self.entries.len() {
                replace_pair(&mut encoded, self.entries[id], id as SymbolId);
            }
        }

        encoded
    }

    /// Decode a symbol-id sequence back into bytes.
    ///
    /// Each id's merge tree is expanded with an explicit stack rather
    /// than native recursion, so arbitrarily deep trees cannot overflow
    /// the call stack: walk down the left spine pushing right children,
    /// emit the leaf byte, pop to resume the pending right subtree.
    /// A leaf is an id below [`LEAF_COUNT`] (a merge may legitimately
    /// have the NUL leaf as its right child, so `right == 0` is not the
    /// leaf test). Out-of-range ids surface as
    /// [`HyperTokenError::UnknownSymbol`].
    pub fn decode(&self, encoded: &[SymbolId]) -> Result<Vec<u8>> {
        let mut decoded = Vec::with_capacity(encoded.len() * 2);
        let mut stack: Vec<SymbolId> = Vec::new();

        for &id in encoded {
            let mut current = id;
            loop {
                if (current as usize) < LEAF_COUNT {
                    // leaf ids are their own byte value
                    decoded.push(current as u8);
                    match stack.pop() {
                        Some(pending) => current = pending,
                        None => break,
                    }
                } else {
                    let symbol = self.get(current)?;
                    stack.push(symbol.right);
                    current = symbol.left;
                }
            }
        }

        Ok(decoded)
    }

    /// Decode a single entry for diagnostics.
    pub fn render(&self, id: SymbolId) -> Result<Vec<u8>> {
        self.decode(&[id])
    }

    /// Persist the dictionary to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a dictionary from a JSON file and validate its invariants.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let dict: Dictionary = serde_json::from_str(&json)?;
        dict.validate()?;
        Ok(dict)
    }

    /// Verify the leaf block and the strictly-increasing child ordering.
    fn validate(&self) -> Result<()> {
        if self.entries.len() < LEAF_COUNT {
            return Err(HyperTokenError::InvalidDictionary(format!(
                "only {} entries, need at least {}",
                self.entries.len(),
                LEAF_COUNT
            )));
        }
        for (i, entry) in self.entries.iter().take(LEAF_COUNT).enumerate() {
            if entry.left != i as SymbolId || entry.right != 0 {
                return Err(HyperTokenError::InvalidDictionary(format!(
                    "entry {} is not the literal leaf for byte {}",
                    i, i
                )));
            }
        }
        for (i, entry) in self.entries.iter().enumerate().skip(LEAF_COUNT) {
            if entry.left as usize >= i || entry.right as usize >= i {
                return Err(HyperTokenError::InvalidDictionary(format!(
                    "merge entry {} references a child >= its own id",
                    i
                )));
            }
        }
        Ok(())
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// Count every adjacent pair in first-seen order and return the most
/// frequent one. Overlapping occurrences all count; ties keep the
/// first-seen pair. `None` when the sequence holds no pair.
fn most_frequent_pair(data: &[SymbolId]) -> Option<(Symbol, usize)> {
    if data.len() < 2 {
        return None;
    }

    let mut seen: Vec<(Symbol, usize)> = Vec::new();
    let mut index: HashMap<Symbol, usize> = HashMap::new();

    for window in data.windows(2) {
        let pair = Symbol {
            left: window[0],
            right: window[1],
        };
        match index.entry(pair) {
            Entry::Occupied(slot) => seen[*slot.get()].1 += 1,
            Entry::Vacant(slot) => {
                slot.insert(seen.len());
                seen.push((pair, 1));
            }
        }
    }

    let mut best = seen[0];
    for &(pair, freq) in &seen[1..] {
        if freq > best.1 {
            best = (pair, freq);
        }
    }
    Some(best)
}

/// Replace every non-overlapping left-to-right occurrence of `pair` with
/// `id`. A match consumes both positions and scanning resumes after it,
/// so overlapping repeats merge pairwise. A trailing unmatched symbol is
/// carried forward unchanged.
fn replace_pair(data: &mut Vec<SymbolId>, pair: Symbol, id: SymbolId) {
    if data.len() < 2 {
        return;
    }

    let mut rewritten = Vec::with_capacity(data.len());
    let mut i = 0;
    while i + 1 < data.len() {
        if data[i] == pair.left && data[i + 1] == pair.right {
            rewritten.push(id);
            i += 2;
        } else {
            rewritten.push(data[i]);
            i += 1;
        }
    }
    if i + 1 == data.len() {
        rewritten.push(data[i]);
    }

    *data = rewritten;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dictionary_is_leaves() {
        let dict = Dictionary::new();
        assert_eq!(dict.len(), LEAF_COUNT);
        assert!(dict.is_empty());
        assert_eq!(dict.get(65).unwrap(), Symbol { left: 65, right: 0 });
    }

    #[test]
    fn test_get_out_of_range() {
        let dict = Dictionary::new();
        assert!(matches!(
            dict.get(300),
            Err(HyperTokenError::UnknownSymbol { id: 300, len: 256 })
        ));
    }

    #[test]
    fn test_decode_single_merge() {
        // Two leaves and one merge referencing them: decode must yield
        // exactly the two leaf bytes in left, right order.
        let mut dict = Dictionary::new();
        dict.entries.push(Symbol { left: 97, right: 98 });

        let decoded = dict.decode(&[256]).unwrap();
        assert_eq!(decoded, b"ab");
    }

    #[test]
    fn test_encode_aaaa_traced() {
        // "aaaa" -> [a,a,a,a]; round 1 counts the overlapping ('a','a')
        // pair 3 times, merges pairwise to [256,256]; 3 > 1 so round 2
        // runs, merges (256,256) once to [257] and stops at frequency 1.
        let mut dict = Dictionary::new();
        let encoded = dict.encode(b"aaaa", 1);

        assert_eq!(encoded, vec![257]);
        assert_eq!(dict.len(), 258);
        assert_eq!(dict.get(256).unwrap(), Symbol { left: 97, right: 97 });
        assert_eq!(dict.get(257).unwrap(), Symbol { left: 256, right: 256 });
        assert_eq!(dict.decode(&encoded).unwrap(), b"aaaa");
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let corpus = b"the quick brown fox jumps over the lazy dog; the dog sleeps";
        let mut dict = Dictionary::new();
        let encoded = dict.encode(corpus, 1);

        assert!(encoded.len() < corpus.len());
        assert_eq!(dict.decode(&encoded).unwrap(), corpus);
    }

    #[test]
    fn test_round_trip_binary_corpus() {
        let corpus: Vec<u8> = (0u16..600).map(|i| (i % 251) as u8).collect();
        let mut dict = Dictionary::new();
        let encoded = dict.encode(&corpus, 2);

        assert_eq!(dict.decode(&encoded).unwrap(), corpus);
    }

    #[test]
    fn test_learn_then_replay_consistency() {
        let corpus = b"abcabc abcabc abcabc tail";
        let mut learned = Dictionary::new();
        let from_learning = learned.encode(corpus, 1);

        // Replaying the learned table over the same corpus must
        // reproduce the learned sequence without growing the table.
        let mut replayer = learned.clone();
        let replayed = replayer.encode(corpus, 0);

        assert_eq!(replayed, from_learning);
        assert_eq!(replayer.len(), learned.len());
    }

    #[test]
    fn test_empty_and_single_byte_corpus() {
        let mut dict = Dictionary::new();
        assert_eq!(dict.encode(b"", 1), Vec::<SymbolId>::new());
        assert_eq!(dict.len(), LEAF_COUNT);

        assert_eq!(dict.encode(b"x", 1), vec![120]);
        assert_eq!(dict.len(), LEAF_COUNT);
    }

    #[test]
    fn test_trailing_symbol_carried_forward() {
        // "aab": one ('a','a') merge, the 'b' must survive the round.
        let mut dict = Dictionary::new();
        let encoded = dict.encode(b"aab", 1);

        assert_eq!(dict.decode(&encoded).unwrap(), b"aab");
        assert_eq!(*encoded.last().unwrap(), 98);
    }

    #[test]
    fn test_round_trip_with_nul_pairs() {
        // A merge whose right child is the NUL leaf must not be
        // mistaken for a leaf during decode.
        let corpus = b"A\0A\0A\0A\0A\0A\0";
        let mut dict = Dictionary::new();
        let encoded = dict.encode(corpus, 1);

        assert_eq!(dict.decode(&encoded).unwrap(), corpus);
    }

    #[test]
    fn test_most_frequent_pair_first_seen_tie() {
        // (1,2) and (3,4) both appear once; first-seen wins.
        let data = vec![1, 2, 0, 3, 4];
        let (pair, freq) = most_frequent_pair(&data).unwrap();
        assert_eq!(pair, Symbol { left: 1, right: 2 });
        assert_eq!(freq, 1);
    }

    #[test]
    fn test_most_frequent_pair_counts_overlaps() {
        let data = vec![7, 7, 7, 7];
        let (pair, freq) = most_frequent_pair(&data).unwrap();
        assert_eq!(pair, Symbol { left: 7, right: 7 });
        assert_eq!(freq, 3);
    }

    #[test]
    fn test_replace_merges_pairwise_not_globally() {
        let mut data = vec![5, 5, 5, 5, 5];
        replace_pair(&mut data, Symbol { left: 5, right: 5 }, 300);
        // Non-overlapping left-to-right: (5,5)(5,5) then a lone 5.
        assert_eq!(data, vec![300, 300, 5]);
    }

    #[test]
    fn test_selected_pair_is_maximal_each_round() {
        // Drive encode by hand and check the selection invariant.
        let corpus = b"ababab xyxyxy ab";
        let mut encoded: Vec<SymbolId> = corpus.iter().map(|&b| b as SymbolId).collect();

        for _ in 0..4 {
            let Some((best, freq)) = most_frequent_pair(&encoded) else {
                break;
            };
            let mut counts: HashMap<Symbol, usize> = HashMap::new();
            for w in encoded.windows(2) {
                *counts
                    .entry(Symbol {
                        left: w[0],
                        right: w[1],
                    })
                    .or_insert(0) += 1;
            }
            assert!(counts.values().all(|&c| c <= freq));
            replace_pair(&mut encoded, best, 999);
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.json");

        let mut dict = Dictionary::new();
        let encoded = dict.encode(b"roundabout roundabout", 1);
        dict.save(&path).unwrap();

        let loaded = Dictionary::load(&path).unwrap();
        assert_eq!(loaded.entries(), dict.entries());
        assert_eq!(loaded.decode(&encoded).unwrap(), b"roundabout roundabout");
    }

    #[test]
    fn test_load_rejects_corrupt_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");

        let mut dict = Dictionary::new();
        // Merge entry referencing a child >= its own id.
        dict.entries.push(Symbol {
            left: 400,
            right: 1,
        });
        dict.save(&path).unwrap();

        assert!(matches!(
            Dictionary::load(&path),
            Err(HyperTokenError::InvalidDictionary(_))
        ));
    }
}
