pub mod classify;
pub mod cluster;
pub mod config;
pub mod cutpoint;
pub mod wordsize;

use anyhow::{Context, Result};
use sccs_bio::{parse_fasta, Sequence};
use std::path::Path;

/// Parse a FASTA file, failing on an empty one
pub fn read_sequences(path: &Path) -> Result<Vec<Sequence>> {
    let sequences =
        parse_fasta(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if sequences.is_empty() {
        return Err(sccs_core::SccsError::EmptyInput(format!(
            "{} holds no sequences",
            path.display()
        ))
        .into());
    }
    Ok(sequences)
}
