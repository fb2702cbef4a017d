use super::{Profile, Word};
use crate::sequence::Sequence;
use indexmap::IndexMap;
use rayon::prelude::*;
use sccs_core::{Alphabet, SccsError, SccsResult};

/// Symbol appended by the cross-boundary window mode
pub const BOUNDARY_PAD: u8 = b'$';

const INVALID: u8 = 0;

/// How windows are laid over a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Windowing {
    /// Every full-length window inside the sequence
    Overlapping,
    /// As `Overlapping`, plus one window that runs off the end onto `pad`
    CrossBoundary { pad: u8 },
}

#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    word_size: usize,
    alphabet: Alphabet,
    windowing: Windowing,
    keep_counts: bool,
}

impl ProfileBuilder {
    pub fn new(word_size: usize, alphabet: Alphabet) -> SccsResult<Self> {
        if word_size == 0 {
            return Err(SccsError::InvalidWordSize {
                word_size,
                length: 0,
            });
        }
        Ok(Self {
            word_size,
            alphabet,
            windowing: Windowing::Overlapping,
            keep_counts: false,
        })
    }

    pub fn with_windowing(mut self, windowing: Windowing) -> Self {
        self.windowing = windowing;
        self
    }

    pub fn cross_boundary(self) -> Self {
        self.with_windowing(Windowing::CrossBoundary { pad: BOUNDARY_PAD })
    }

    /// Keep raw window counts on built profiles
    pub fn with_counts(mut self, keep: bool) -> Self {
        self.keep_counts = keep;
        self
    }

    pub fn word_size(&self) -> usize {
        self.word_size
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Count every surviving window of `symbols`
    pub fn count_words(&self, symbols: &[u8]) -> SccsResult<IndexMap<Word, u64>> {
        let k = self.word_size;
        if k > symbols.len() {
            return Err(SccsError::InvalidWordSize {
                word_size: k,
                length: symbols.len(),
            });
        }

        let mut encoded: Vec<u8> = symbols
            .iter()
            .map(|&s| self.alphabet.encode(s).unwrap_or(INVALID))
            .collect();
        if let Windowing::CrossBoundary { pad } = self.windowing {
            encoded.push(pad);
        }

        let mut counts: IndexMap<Word, u64> = IndexMap::new();
        // Length of the current run of in-alphabet symbols
        let mut run = 0usize;
        for (i, &symbol) in encoded.iter().enumerate() {
            if symbol == INVALID {
                run = 0;
                continue;
            }
            run += 1;
            if run >= k {
                *counts
                    .entry(Word::from_slice(&encoded[i + 1 - k..=i]))
                    .or_insert(0) += 1;
            }
        }

        if counts.is_empty() {
            return Err(SccsError::EmptyInput(format!(
                "no {}-mer window over the {} alphabet survived",
                k, self.alphabet
            )));
        }
        Ok(counts)
    }

    pub fn build_symbols(&self, symbols: &[u8]) -> SccsResult<Profile> {
        let profile = Profile::from_counts(self.word_size, self.count_words(symbols)?)?;
        Ok(if self.keep_counts {
            profile
        } else {
            profile.without_counts()
        })
    }

    pub fn build(&self, sequence: &Sequence) -> SccsResult<Profile> {
        self.build_symbols(&sequence.sequence)
    }

    /// Profile every sequence, keeping per-sequence failures
    pub fn build_each(&self, sequences: &[Sequence]) -> Vec<SccsResult<Profile>> {
        sequences.par_iter().map(|s| self.build(s)).collect()
    }

    /// Profile every sequence, failing on the first one that cannot be profiled
    pub fn build_all(&self, sequences: &[Sequence]) -> SccsResult<Vec<Profile>> {
        sequences.par_iter().map(|s| self.build(s)).collect()
    }
}
