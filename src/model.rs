//! Sequence model: trigram bundling and nearest-neighbor prediction.
//!
//! Every dictionary entry gets one random embedding, aligned by id. A
//! corpus pass composes each consecutive symbol triple into a trigram
//! vector and bundles all of them into a single profile vector. A query
//! then binds two known symbols (in their trigram roles) against the
//! profile; whatever survives is closest to the embedding of the symbol
//! that most often completed that pair, recovered by a linear
//! minimum-distance scan — the VSA clean-up step.

use crate::accumulator::Accumulator;
use crate::codec::SymbolId;
use crate::error::{HyperTokenError, Result};
use crate::primitives::Primitives;
use crate::vector::BitVector;
use crate::vector_manager::VectorManager;

/// A trained sequence model: a profile vector plus the embedding table
/// it was bundled from.
#[derive(Clone, Debug)]
pub struct SequenceModel {
    dimensions: usize,
    profile: BitVector,
    embeddings: Vec<BitVector>,
}

impl SequenceModel {
    /// Build a model from an encoded corpus.
    ///
    /// Generates one embedding per dictionary entry (`symbol_count` of
    /// them, aligned by id), bundles every consecutive trigram of
    /// `encoded`, and collapses with threshold = half the sequence
    /// length. The encoded sequence must contain at least one trigram
    /// and every id in it must be below `symbol_count`.
    pub fn build(
        manager: &VectorManager,
        symbol_count: usize,
        encoded: &[SymbolId],
    ) -> Result<Self> {
        if encoded.len() < 3 {
            return Err(HyperTokenError::EmptyCorpus(format!(
                "{} symbols, need at least 3 for a trigram",
                encoded.len()
            )));
        }
        if let Some(&id) = encoded.iter().find(|&&id| id as usize >= symbol_count) {
            return Err(HyperTokenError::UnknownSymbol {
                id,
                len: symbol_count,
            });
        }

        let embeddings = manager.embedding_table(symbol_count);

        let mut sum = Accumulator::new(manager.dimensions());
        for window in encoded.windows(3) {
            let indices = [
                window[0] as usize,
                window[1] as usize,
                window[2] as usize,
            ];
            sum.add(&Primitives::compose_query(&embeddings, &indices));
        }

        let profile = sum.collapse((encoded.len() / 2) as u32);

        Ok(Self {
            dimensions: manager.dimensions(),
            profile,
            embeddings,
        })
    }

    /// Assemble a model from a previously stored profile and embedding
    /// table (see [`storage`](crate::storage)).
    pub fn from_parts(profile: BitVector, embeddings: Vec<BitVector>) -> Result<Self> {
        let dimensions = profile.dimensions();
        for e in &embeddings {
            if e.dimensions() != dimensions {
                return Err(HyperTokenError::DimensionMismatch {
                    expected: dimensions,
                    got: e.dimensions(),
                });
            }
        }
        Ok(Self {
            dimensions,
            profile,
            embeddings,
        })
    }

    /// Get the dimensionality.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The bundled profile vector.
    pub fn profile(&self) -> &BitVector {
        &self.profile
    }

    /// The embedding table, aligned with dictionary ids.
    pub fn embeddings(&self) -> &[BitVector] {
        &self.embeddings
    }

    /// Predict the symbol most likely to follow the pair `(a, b)`.
    ///
    /// Composes the partial trigram
    /// `bind(bind(rotate(e_a, 2), rotate(e_b, 1)), profile)` and scans
    /// the whole embedding table for the minimum distance. The first
    /// minimum wins ties. `a` and `b` are checked against the table.
    pub fn predict_next(&self, a: SymbolId, b: SymbolId) -> Result<SymbolId> {
        let e_a = self.embedding(a)?;
        let e_b = self.embedding(b)?;

        let query = Primitives::bind(
            &Primitives::bind(&Primitives::rotate(e_a, 2), &Primitives::rotate(e_b, 1)),
            &self.profile,
        );

        let mut best = 0;
        let mut best_distance = f32::MAX;
        for (i, embedding) in self.embeddings.iter().enumerate() {
            let d = Primitives::distance(embedding, &query);
            if d < best_distance {
                best_distance = d;
                best = i;
            }
        }
        Ok(best as SymbolId)
    }

    /// Checked embedding lookup.
    pub fn embedding(&self, id: SymbolId) -> Result<&BitVector> {
        self.embeddings
            .get(id as usize)
            .ok_or(HyperTokenError::UnknownSymbol {
                id,
                len: self.embeddings.len(),
            })
    }
}

/// State of a [`PredictSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No seed pair yet
    Idle,
    /// Ready to predict the successor of `(a, b)`
    Seeded { a: SymbolId, b: SymbolId },
    /// The sentinel pair was seen; the session is over
    Terminated,
}

/// An interactive prediction session over a trained model.
///
/// The session walks `Idle → Seeded(a,b) → Seeded(b,next) → …` as
/// predictions are consumed, and reaches `Terminated` only when the
/// `(0, 0)` sentinel pair is seeded. Each step feeds the prediction
/// back as the new second element of the pair.
#[derive(Clone, Debug)]
pub struct PredictSession<'a> {
    model: &'a SequenceModel,
    state: SessionState,
}

impl<'a> PredictSession<'a> {
    /// Start an idle session over a model.
    pub fn new(model: &'a SequenceModel) -> Self {
        Self {
            model,
            state: SessionState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Seed the session with a symbol pair. The `(0, 0)` sentinel
    /// terminates instead; a terminated session cannot be re-seeded.
    pub fn seed(&mut self, a: SymbolId, b: SymbolId) {
        if self.state == SessionState::Terminated {
            return;
        }
        self.state = if a == 0 && b == 0 {
            SessionState::Terminated
        } else {
            SessionState::Seeded { a, b }
        };
    }

    /// Predict one symbol and advance the pair window.
    ///
    /// Returns `Ok(None)` when the session is idle or terminated.
    pub fn step(&mut self) -> Result<Option<SymbolId>> {
        let SessionState::Seeded { a, b } = self.state else {
            return Ok(None);
        };
        let next = self.model.predict_next(a, b)?;
        self.state = SessionState::Seeded { a: b, b: next };
        Ok(Some(next))
    }
}
