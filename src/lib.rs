//! # Hypertoken: byte-pair tokens in hyperdimensional space
//!
//! Hypertoken learns a byte-pair merge dictionary over a corpus,
//! assigns each dictionary symbol a random high-dimensional binary
//! vector, and bundles the corpus's symbol trigrams into a single
//! "profile" vector. Given any two symbols, the most likely successor
//! is recovered by unbinding the pair against the profile and running a
//! nearest-neighbor scan over the symbol embeddings.
//!
//! ## Quick start
//!
//! ```no_run
//! use hypertoken::HyperToken;
//!
//! let corpus = std::fs::read("corpus.txt")?;
//!
//! let mut ht = HyperToken::with_seed(8192, 42);
//! let stats = ht.train(&corpus, 1)?;
//! println!("{} bytes -> {} symbols", stats.original_len, stats.encoded_len);
//!
//! // Predict a short continuation of the pair (a, b).
//! let next = ht.predict_next(97, 98)?;
//! let text = ht.decode(&[97, 98, next])?;
//! println!("{}", String::from_utf8_lossy(&text));
//! # Ok::<(), hypertoken::HyperTokenError>(())
//! ```
//!
//! ## Core concepts
//!
//! - **Symbol**: a dictionary entry — a literal byte or a merge of two
//!   earlier symbols ([`codec`])
//! - **Binding**: XOR composition of vectors ([`primitives`])
//! - **Bundling**: majority-vote aggregation over a corpus pass
//!   ([`accumulator`])
//! - **Profile**: the bundled trigram summary queried at prediction
//!   time ([`model`])

pub mod accumulator;
pub mod codec;
pub mod error;
pub mod model;
pub mod primitives;
pub mod storage;
pub mod vector;
pub mod vector_manager;

// Re-exports for convenience
pub use accumulator::Accumulator;
pub use codec::{Dictionary, Symbol, SymbolId, LEAF_COUNT};
pub use error::{HyperTokenError, Result};
pub use model::{PredictSession, SequenceModel, SessionState};
pub use primitives::Primitives;
pub use vector::{BitVector, DEFAULT_DIMENSIONS};
pub use vector_manager::VectorManager;

/// Statistics reported after training.
#[derive(Clone, Copy, Debug)]
pub struct TrainStats {
    /// Corpus size in bytes
    pub original_len: usize,
    /// Encoded sequence length in symbols
    pub encoded_len: usize,
    /// Dictionary size after learning (leaves + merges)
    pub dictionary_len: usize,
}

/// The main hypertoken session — dictionary, encoded corpus and
/// sequence model under one roof.
///
/// All state is exclusively owned by the session and dropped with it;
/// two sessions built with the same seed over the same corpus are
/// bit-identical.
pub struct HyperToken {
    dimensions: usize,
    manager: VectorManager,
    dictionary: Dictionary,
    encoded: Vec<SymbolId>,
    model: Option<SequenceModel>,
}

impl HyperToken {
    /// Create a session with the default seed.
    pub fn new(dimensions: usize) -> Self {
        Self::with_seed(dimensions, 0)
    }

    /// Create a session with an explicit embedding seed.
    pub fn with_seed(dimensions: usize, global_seed: u64) -> Self {
        Self {
            dimensions,
            manager: VectorManager::with_seed(dimensions, global_seed),
            dictionary: Dictionary::new(),
            encoded: Vec::new(),
            model: None,
        }
    }

    /// Get the vector dimensionality.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The merge dictionary.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// The encoded corpus from the last [`train`](Self::train) call.
    pub fn encoded(&self) -> &[SymbolId] {
        &self.encoded
    }

    /// The trained sequence model, if any.
    pub fn model(&self) -> Result<&SequenceModel> {
        self.model.as_ref().ok_or(HyperTokenError::NotTrained)
    }

    /// Learn a dictionary over `corpus` and build the sequence model.
    ///
    /// `min_frequency` controls how long merging continues (see
    /// [`Dictionary::encode`]); the encoded corpus must still hold at
    /// least one trigram afterwards.
    pub fn train(&mut self, corpus: &[u8], min_frequency: usize) -> Result<TrainStats> {
        self.encoded = self.dictionary.encode(corpus, min_frequency);
        self.model = Some(SequenceModel::build(
            &self.manager,
            self.dictionary.len(),
            &self.encoded,
        )?);

        Ok(TrainStats {
            original_len: corpus.len(),
            encoded_len: self.encoded.len(),
            dictionary_len: self.dictionary.len(),
        })
    }

    /// Re-encode new bytes against the learned dictionary (replay
    /// mode; the dictionary does not grow).
    pub fn encode(&mut self, bytes: &[u8]) -> Vec<SymbolId> {
        self.dictionary.encode(bytes, 0)
    }

    /// Decode a symbol sequence back to bytes.
    pub fn decode(&self, encoded: &[SymbolId]) -> Result<Vec<u8>> {
        self.dictionary.decode(encoded)
    }

    /// Predict the most likely successor of the pair `(a, b)`.
    pub fn predict_next(&self, a: SymbolId, b: SymbolId) -> Result<SymbolId> {
        self.model()?.predict_next(a, b)
    }

    /// Start an interactive prediction session.
    pub fn session(&self) -> Result<PredictSession<'_>> {
        Ok(PredictSession::new(self.model()?))
    }

    /// Store the profile and embedding table to a binary vector file.
    pub fn save_vectors(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let model = self.model()?;
        storage::store(path, model.profile(), model.embeddings())
    }

    /// Load a profile and embedding table stored by
    /// [`save_vectors`](Self::save_vectors). `count` must match the
    /// dictionary length the file was written with; it is not recorded
    /// in the file.
    pub fn load_vectors(&mut self, path: impl AsRef<std::path::Path>, count: usize) -> Result<()> {
        let (profile, embeddings) = storage::load(path, self.dimensions, count)?;
        self.model = Some(SequenceModel::from_parts(profile, embeddings)?);
        Ok(())
    }

    /// Persist the dictionary as JSON.
    pub fn save_dictionary(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.dictionary.save(path)
    }

    /// Replace the session dictionary with one loaded from JSON.
    /// Clears any encoded corpus and model, which were aligned to the
    /// old table.
    pub fn load_dictionary(&mut self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.dictionary = Dictionary::load(path)?;
        self.encoded.clear();
        self.model = None;
        Ok(())
    }
}

impl Default for HyperToken {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}
