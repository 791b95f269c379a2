//! Error types for hypertoken.

use thiserror::Error;

/// Hypertoken error types.
#[derive(Error, Debug)]
pub enum HyperTokenError {
    /// File open/read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Vector file does not start with the expected magic constant
    #[error("bad vector-file magic: found {found:#010x}")]
    BadMagic { found: u32 },

    /// Vector file ended before all requested records were read
    #[error("truncated vector file: expected {expected} bytes, got {got}")]
    TruncatedFile { expected: usize, got: usize },

    /// Symbol id outside the dictionary / embedding table
    #[error("unknown symbol id {id} (table holds {len} entries)")]
    UnknownSymbol { id: u32, len: usize },

    /// Vectors of different dimensionality at an API seam
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Persisted dictionary failed validation on load
    #[error("invalid dictionary: {0}")]
    InvalidDictionary(String),

    /// Dictionary serialization error
    #[error("dictionary serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Corpus too short to train on
    #[error("corpus too short: {0}")]
    EmptyCorpus(String),

    /// Prediction requested before a model was built or loaded
    #[error("no sequence model: train on a corpus or load stored vectors first")]
    NotTrained,
}

/// Result type alias for hypertoken operations.
pub type Result<T> = std::result::Result<T, HyperTokenError>;
