//! k-mer probability profiles
//!
//! A [`Profile`] maps each observed word of a fixed length to its relative
//! frequency. Profiles are built by [`ProfileBuilder`], pooled into centroids
//! by [`hybrid_profile`], and the word length itself is chosen by
//! [`WordSizeSelector`].

pub mod builder;
pub mod hybrid;
pub mod word_size;

pub use builder::{ProfileBuilder, Windowing, BOUNDARY_PAD};
pub use hybrid::{hybrid_profile, HybridAccumulator, ProfileInput};
pub use word_size::{WordSizeSelector, MIN_WORD_SIZE};

use indexmap::IndexMap;
use sccs_core::{SccsError, SccsResult};
use smallvec::SmallVec;

/// A k-mer; short words stay inline
pub type Word = SmallVec<[u8; 16]>;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    word_size: usize,
    probabilities: IndexMap<Word, f64>,
    counts: Option<IndexMap<Word, u64>>,
    windows: u64,
}

impl Profile {
    /// Normalize raw window counts; the counts are kept alongside the probabilities
    pub fn from_counts(word_size: usize, counts: IndexMap<Word, u64>) -> SccsResult<Self> {
        let windows: u64 = counts.values().sum();
        if windows == 0 {
            return Err(SccsError::EmptyInput(format!(
                "no {}-mer windows to normalize",
                word_size
            )));
        }

        let total = windows as f64;
        let probabilities = counts
            .iter()
            .map(|(word, &count)| (word.clone(), count as f64 / total))
            .collect();

        Ok(Self {
            word_size,
            probabilities,
            counts: Some(counts),
            windows,
        })
    }

    /// Normalize non-negative weights (e.g. pooled member probabilities)
    pub fn from_weights(word_size: usize, weights: IndexMap<Word, f64>) -> SccsResult<Self> {
        let total: f64 = weights.values().sum();
        if !(total > 0.0) || !total.is_finite() {
            return Err(SccsError::EmptyInput(format!(
                "no {}-mer mass to normalize",
                word_size
            )));
        }

        let probabilities = weights
            .into_iter()
            .filter(|(_, w)| *w > 0.0)
            .map(|(word, w)| (word, w / total))
            .collect();

        Ok(Self {
            word_size,
            probabilities,
            counts: None,
            windows: 0,
        })
    }

    pub fn word_size(&self) -> usize {
        self.word_size
    }

    pub fn probability(&self, word: &[u8]) -> f64 {
        self.probabilities.get(word).copied().unwrap_or(0.0)
    }

    pub fn probabilities(&self) -> &IndexMap<Word, f64> {
        &self.probabilities
    }

    pub fn counts(&self) -> Option<&IndexMap<Word, u64>> {
        self.counts.as_ref()
    }

    /// Number of windows counted; 0 for derived profiles
    pub fn windows(&self) -> u64 {
        self.windows
    }

    /// Number of distinct words with non-zero probability
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], f64)> {
        self.probabilities.iter().map(|(w, &p)| (w.as_slice(), p))
    }

    /// Drop the raw counts once only probabilities are needed
    pub fn without_counts(mut self) -> Self {
        self.counts = None;
        self
    }

    pub fn check_compatible(&self, other: &Profile) -> SccsResult<()> {
        if self.word_size != other.word_size {
            return Err(SccsError::InvalidParameter(format!(
                "profiles built at different word sizes ({} vs {})",
                self.word_size, other.word_size
            )));
        }
        Ok(())
    }
}
