//! Hybrid (centroid) profiles pooled from member profiles

use super::builder::ProfileBuilder;
use super::{Profile, Word};
use crate::sequence::Sequence;
use indexmap::IndexMap;
use rayon::prelude::*;
use sccs_core::{SccsError, SccsResult};
use tracing::debug;

/// Members of a hybrid, either still raw or already profiled
#[derive(Debug, Clone, Copy)]
pub enum ProfileInput<'a> {
    RawSequences(&'a [Sequence]),
    Precomputed(&'a [Profile]),
}

impl ProfileInput<'_> {
    pub fn len(&self) -> usize {
        match self {
            ProfileInput::RawSequences(seqs) => seqs.len(),
            ProfileInput::Precomputed(profiles) => profiles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Running sum of member probabilities; merging is associative and commutative
#[derive(Debug, Clone, Default)]
pub struct HybridAccumulator {
    word_size: Option<usize>,
    sums: IndexMap<Word, f64>,
    members: usize,
}

impl HybridAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> usize {
        self.members
    }

    fn check_word_size(&mut self, word_size: usize) -> SccsResult<()> {
        match self.word_size {
            Some(existing) if existing != word_size => Err(SccsError::InvalidParameter(format!(
                "hybrid members built at different word sizes ({} vs {})",
                existing, word_size
            ))),
            _ => {
                self.word_size = Some(word_size);
                Ok(())
            }
        }
    }

    pub fn add(&mut self, profile: &Profile) -> SccsResult<()> {
        self.check_word_size(profile.word_size())?;
        for (word, p) in profile.probabilities() {
            *self.sums.entry(word.clone()).or_insert(0.0) += p;
        }
        self.members += 1;
        Ok(())
    }

    pub fn merge(mut self, other: HybridAccumulator) -> SccsResult<Self> {
        if let Some(word_size) = other.word_size {
            self.check_word_size(word_size)?;
        }
        for (word, p) in other.sums {
            *self.sums.entry(word).or_insert(0.0) += p;
        }
        self.members += other.members;
        Ok(self)
    }

    /// Mean member probability per word, renormalized
    pub fn finish(self) -> SccsResult<Profile> {
        let word_size = match self.word_size {
            Some(k) if self.members > 0 => k,
            _ => {
                return Err(SccsError::EmptyInput(
                    "hybrid profile has no members".to_string(),
                ))
            }
        };
        let members = self.members as f64;
        let means = self
            .sums
            .into_iter()
            .map(|(word, sum)| (word, sum / members))
            .collect();
        Profile::from_weights(word_size, means)
    }
}

/// Pool members into a single centroid profile at the builder's word size.
///
/// Raw sequences that cannot be profiled at that size are left out; the
/// hybrid fails only when no member remains.
pub fn hybrid_profile(builder: &ProfileBuilder, input: ProfileInput<'_>) -> SccsResult<Profile> {
    let accumulator = match input {
        ProfileInput::Precomputed(profiles) => {
            if let Some(p) = profiles.iter().find(|p| p.word_size() != builder.word_size()) {
                return Err(SccsError::InvalidParameter(format!(
                    "precomputed profile at word size {} given to a word size {} hybrid",
                    p.word_size(),
                    builder.word_size()
                )));
            }
            profiles
                .par_iter()
                .try_fold(HybridAccumulator::new, |mut acc, profile| {
                    acc.add(profile)?;
                    Ok(acc)
                })
                .try_reduce(HybridAccumulator::new, |a, b| a.merge(b))?
        }
        ProfileInput::RawSequences(sequences) => sequences
            .par_iter()
            .map(|s| (s, builder.build(s)))
            .try_fold(HybridAccumulator::new, |mut acc, (sequence, profile)| {
                match profile {
                    Ok(profile) => acc.add(&profile)?,
                    Err(SccsError::InvalidWordSize { .. }) | Err(SccsError::EmptyInput(_)) => {
                        debug!("Leaving {} out of the hybrid profile", sequence.entry)
                    }
                    Err(e) => return Err(e),
                }
                Ok(acc)
            })
            .try_reduce(HybridAccumulator::new, |a, b| a.merge(b))?,
    };

    debug!(
        "Hybrid profile from {} of {} members",
        accumulator.members(),
        input.len()
    );
    accumulator.finish()
}
