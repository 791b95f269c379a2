//! Interactive next-symbol predictor.
//!
//! Trains a hypertoken session on a corpus file, then reads `a,b`
//! symbol-id pairs from stdin. Each accepted pair runs a fixed number
//! of prediction steps and prints the decoded continuation. The pair
//! `0,0` ends the session; malformed lines are ignored.

use clap::Parser;
use hypertoken::{HyperToken, SymbolId};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

/// Printable ASCII range kept in predicted output.
const PRINTABLE: std::ops::RangeInclusive<u32> = 32..=126;

#[derive(Parser, Debug)]
#[command(name = "predict", about = "Byte-pair + HDV next-symbol predictor")]
struct Args {
    /// Corpus file to train on
    corpus: PathBuf,

    /// Merge threshold: learning continues while the merged pair's
    /// frequency strictly exceeds this
    #[arg(long, default_value_t = 1)]
    min_frequency: usize,

    /// Vector dimensionality (multiple of 64)
    #[arg(long, default_value_t = 8192)]
    dimensions: usize,

    /// Embedding seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Prediction steps per input pair
    #[arg(long, default_value_t = 1000)]
    steps: usize,

    /// Write the profile and embedding table to a vector file
    #[arg(long)]
    save_vectors: Option<PathBuf>,

    /// Load a previously stored vector file instead of bundling
    #[arg(long)]
    load_vectors: Option<PathBuf>,

    /// Write the learned dictionary as JSON
    #[arg(long)]
    save_dictionary: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let corpus = match std::fs::read(&args.corpus) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("could not load '{}': {}", args.corpus.display(), e);
            return ExitCode::from(2);
        }
    };

    match run(&args, &corpus) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, corpus: &[u8]) -> hypertoken::Result<()> {
    let mut ht = HyperToken::with_seed(args.dimensions, args.seed);
    let stats = ht.train(corpus, args.min_frequency)?;

    info!("encoded data from '{}'", args.corpus.display());
    info!("  original size: {}", stats.original_len);
    info!("  reduced size: {}", stats.encoded_len);
    info!("  byte-pair table size: {}", stats.dictionary_len);

    if let Some(path) = &args.load_vectors {
        ht.load_vectors(path, stats.dictionary_len)?;
        info!("loaded vectors from '{}'", path.display());
    } else {
        info!("combined all trigrams into profile vector");
    }

    if let Some(path) = &args.save_vectors {
        ht.save_vectors(path)?;
        info!("stored vectors to '{}'", path.display());
    }
    if let Some(path) = &args.save_dictionary {
        ht.save_dictionary(path)?;
        info!("stored dictionary to '{}'", path.display());
    }

    let table_len = ht.dictionary().len();
    let stdin = std::io::stdin();

    info!("enter table indices as 'a,b' (0,0 quits):");
    for line in stdin.lock().lines() {
        let line = line?;
        let Some((a, b)) = parse_pair(&line) else {
            debug!("ignoring malformed line: {:?}", line);
            continue;
        };

        if a == 0 && b == 0 {
            break;
        }
        if a as usize >= table_len || b as usize >= table_len {
            warn!("ids out of range (table holds {} entries)", table_len);
            continue;
        }

        let mut predicted = vec![a, b];
        let mut session = ht.session()?;
        session.seed(a, b);
        for _ in 0..args.steps {
            match session.step()? {
                Some(next) => {
                    // Keep merges and printable literals, drop control bytes.
                    if PRINTABLE.contains(&next) || next as usize >= hypertoken::LEAF_COUNT {
                        predicted.push(next);
                    }
                }
                None => break,
            }
        }
        let decoded = ht.decode(&predicted)?;
        info!("output: {}", display_text(&decoded));
        info!("enter table indices as 'a,b' (0,0 quits):");
    }

    Ok(())
}

/// Parse a line as two comma-separated symbol ids.
fn parse_pair(line: &str) -> Option<(SymbolId, SymbolId)> {
    let (a, b) = line.trim().split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

/// Replace non-printable bytes with '.' and newlines with spaces.
fn display_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            b'\n' => ' ',
            b if PRINTABLE.contains(&(b as u32)) => b as char,
            _ => '.',
        })
        .collect()
}
