//! Binary vector-file storage.
//!
//! Fixed little-endian layout with no internal length field:
//!
//! ```text
//! offset 0   : u32 magic (0x48445653, "HDVS")
//! offset 4   : profile vector, D/64 u64 words
//! offset 4+V : N embedding records of the same size
//! ```
//!
//! The record count N is NOT stored; the caller must supply it on load
//! (it is the dictionary length, which travels separately). Loading a
//! file with the wrong N either truncates silently or fails short, so
//! the caller owns that bookkeeping.

use crate::error::{HyperTokenError, Result};
use crate::vector::{BitVector, BITS_PER_WORD};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::warn;

/// Magic constant at the head of every vector file.
pub const VECTOR_FILE_MAGIC: u32 = 0x4844_5653;

/// Write the profile vector and embedding table to `path`.
///
/// Any short write surfaces as an I/O error; the file contents are
/// unspecified after a failure.
pub fn store(path: impl AsRef<Path>, profile: &BitVector, embeddings: &[BitVector]) -> Result<()> {
    for e in embeddings {
        if e.dimensions() != profile.dimensions() {
            return Err(HyperTokenError::DimensionMismatch {
                expected: profile.dimensions(),
                got: e.dimensions(),
            });
        }
    }

    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(&VECTOR_FILE_MAGIC.to_le_bytes())?;
    write_vector(&mut file, profile)?;
    for e in embeddings {
        write_vector(&mut file, e)?;
    }
    file.flush()?;
    Ok(())
}

/// Read the profile vector and `count` embedding records from `path`.
///
/// Fails without partial state if the file cannot be opened, is shorter
/// than the requested layout, or carries the wrong magic (the mismatch
/// is also logged at WARN).
pub fn load(
    path: impl AsRef<Path>,
    dimensions: usize,
    count: usize,
) -> Result<(BitVector, Vec<BitVector>)> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let record_bytes = dimensions / 8;
    let expected = 4 + record_bytes * (count + 1);
    let actual = file.metadata()?.len() as usize;
    if actual < expected {
        return Err(HyperTokenError::TruncatedFile {
            expected,
            got: actual,
        });
    }

    let mut reader = BufReader::new(file);

    let mut magic_bytes = [0u8; 4];
    reader.read_exact(&mut magic_bytes)?;
    let magic = u32::from_le_bytes(magic_bytes);
    if magic != VECTOR_FILE_MAGIC {
        warn!("invalid vector file magic {:#010x} in '{}'", magic, path.display());
        return Err(HyperTokenError::BadMagic { found: magic });
    }

    let profile = read_vector(&mut reader, dimensions)?;
    let mut embeddings = Vec::with_capacity(count);
    for _ in 0..count {
        embeddings.push(read_vector(&mut reader, dimensions)?);
    }

    Ok((profile, embeddings))
}

fn write_vector(writer: &mut impl Write, vector: &BitVector) -> Result<()> {
    for &word in vector.words() {
        writer.write_all(&word.to_le_bytes())?;
    }
    Ok(())
}

fn read_vector(reader: &mut impl Read, dimensions: usize) -> Result<BitVector> {
    let mut words = vec![0u64; dimensions / BITS_PER_WORD];
    let mut buf = [0u8; 8];
    for word in &mut words {
        reader.read_exact(&mut buf)?;
        *word = u64::from_le_bytes(buf);
    }
    Ok(BitVector::from_words(words))
}
