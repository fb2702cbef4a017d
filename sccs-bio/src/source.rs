//! Sequence sources: resolve entry references to symbols

use crate::formats::fasta::parse_fasta;
use crate::sequence::Sequence;
use dashmap::DashMap;
use rayon::prelude::*;
use sccs_core::{EntryRef, GenomeRegistry, SccsError, SccsResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Anything that can hand out the symbols of a region
pub trait SequenceSource: Send + Sync {
    /// Fetch `entry` widened by `delta` on both sides, oriented to its strand
    fn fetch(&self, entry: &EntryRef, delta: u64) -> SccsResult<Sequence>;

    fn fetch_all(&self, entries: &[EntryRef], delta: u64) -> Vec<SccsResult<Sequence>> {
        entries.par_iter().map(|e| self.fetch(e, delta)).collect()
    }
}

/// Cut a region out of a chromosome; the end is clamped to the chromosome length
pub fn extract_region(chromosome: &[u8], entry: &EntryRef, delta: u64) -> SccsResult<Sequence> {
    let region = entry.extended(delta);
    let length = chromosome.len() as u64;
    if region.start >= length {
        return Err(SccsError::InvalidParameter(format!(
            "{} starts past the end of {} ({} bases)",
            region, entry.name, length
        )));
    }

    let end = region.end.min(length);
    let symbols = chromosome[region.start as usize..end as usize].to_ascii_uppercase();
    let clamped = EntryRef::new(entry.name.clone(), region.start, end, entry.strand);
    Ok(Sequence::new(clamped, symbols).oriented())
}

/// Chromosomes held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemorySequenceSource {
    chromosomes: HashMap<String, Vec<u8>>,
}

impl MemorySequenceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// One chromosome per sequence, named after its entry
    pub fn from_sequences(sequences: impl IntoIterator<Item = Sequence>) -> Self {
        let mut source = Self::new();
        for seq in sequences {
            source.insert(seq.entry.name, seq.sequence);
        }
        source
    }

    pub fn insert(&mut self, name: impl Into<String>, symbols: Vec<u8>) {
        self.chromosomes.insert(name.into(), symbols);
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }
}

impl SequenceSource for MemorySequenceSource {
    fn fetch(&self, entry: &EntryRef, delta: u64) -> SccsResult<Sequence> {
        let chromosome = self
            .chromosomes
            .get(&entry.name)
            .ok_or_else(|| SccsError::NotFound(format!("No sequence named {}", entry.name)))?;
        extract_region(chromosome, entry, delta)
    }
}

const CHROMOSOME_EXTENSIONS: [&str; 4] = ["fa", "fasta", "fa.gz", "fasta.gz"];

/// Chromosome FASTA files in a registered genome directory, loaded lazily
#[derive(Debug)]
pub struct GenomeSource {
    key: String,
    dir: PathBuf,
    cache: DashMap<String, Arc<Vec<u8>>>,
}

impl GenomeSource {
    pub fn new(registry: &GenomeRegistry, key: &str) -> SccsResult<Self> {
        let dir = registry.resolve(key)?;
        if !dir.is_dir() {
            return Err(SccsError::NotFound(format!(
                "Genome directory for '{}' does not exist: {}",
                key,
                dir.display()
            )));
        }
        Ok(Self::from_dir(key, dir))
    }

    pub fn from_dir(key: &str, dir: &Path) -> Self {
        Self {
            key: key.to_string(),
            dir: dir.to_path_buf(),
            cache: DashMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn chromosome_path(&self, name: &str) -> SccsResult<PathBuf> {
        CHROMOSOME_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", name, ext)))
            .find(|p| p.is_file())
            .ok_or_else(|| {
                SccsError::NotFound(format!(
                    "No FASTA file for {} in genome '{}' ({})",
                    name,
                    self.key,
                    self.dir.display()
                ))
            })
    }

    fn chromosome(&self, name: &str) -> SccsResult<Arc<Vec<u8>>> {
        if let Some(cached) = self.cache.get(name) {
            return Ok(Arc::clone(cached.value()));
        }

        let path = self.chromosome_path(name)?;
        let mut records = parse_fasta(&path)?;
        if records.is_empty() {
            return Err(SccsError::NotFound(format!(
                "{} holds no records",
                path.display()
            )));
        }
        // Single-record files may name the record differently from the file
        let index = records
            .iter()
            .position(|r| r.entry.name == name)
            .unwrap_or(0);
        let record = records.swap_remove(index);

        debug!("Loaded {} ({} bases) from {}", name, record.len(), path.display());
        let symbols = Arc::new(record.sequence);
        Ok(Arc::clone(
            self.cache
                .entry(name.to_string())
                .or_insert(symbols)
                .value(),
        ))
    }

    /// Number of chromosomes loaded so far
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl SequenceSource for GenomeSource {
    fn fetch(&self, entry: &EntryRef, delta: u64) -> SccsResult<Sequence> {
        let chromosome = self.chromosome(&entry.name)?;
        extract_region(&chromosome, entry, delta)
    }
}
