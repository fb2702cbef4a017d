//! Word-size selection by cumulative relative entropy (CRE).
//!
//! For each word length `l`, the observed `l`-mer distribution is compared
//! with the one predicted from `(l-1)`-mer statistics,
//! `E(a.m.b) = c(a.m) c(m.b) / c(m.*)`. The relative entropy between the two
//! measures how much information words of length `l` add over shorter words.
//! `CRE(k)` sums that gain for all lengths from `k` up to the limit; the
//! selected word size is the shortest one past which little is left.
//!
//! Finite sequences make the plug-in estimate positive even where the true
//! gain is zero. Each `RE(l)` has its expected null value
//! `sum_m (r_m - 1)(c_m - 1) / (2 N ln 2)` removed, and only lengths with
//! `|alphabet|^(l+1)` at most the sequence length are evaluated.

use super::builder::{ProfileBuilder, BOUNDARY_PAD};
use super::Word;
use crate::sequence::Sequence;
use indexmap::IndexMap;
use sccs_core::{Alphabet, SccsError, SccsResult, WordSizeConfig};
use tracing::{debug, warn};

/// Smallest word size ever selected
pub const MIN_WORD_SIZE: usize = 3;

#[derive(Debug, Clone)]
pub struct WordSizeSelector {
    sample_size: usize,
    limit: usize,
    crecut: f64,
    alphabet: Alphabet,
}

impl WordSizeSelector {
    pub fn new(config: &WordSizeConfig, alphabet: Alphabet) -> SccsResult<Self> {
        if config.limit < MIN_WORD_SIZE {
            return Err(SccsError::InvalidParameter(format!(
                "word size limit must be at least {}, got {}",
                MIN_WORD_SIZE, config.limit
            )));
        }
        if !(config.crecut > 0.0) {
            return Err(SccsError::InvalidParameter(format!(
                "crecut must be positive, got {}",
                config.crecut
            )));
        }
        if config.sample_size == 0 {
            return Err(SccsError::InvalidParameter(
                "word size sample must hold at least one sequence".to_string(),
            ));
        }

        Ok(Self {
            sample_size: config.sample_size,
            limit: config.limit,
            crecut: config.crecut,
            alphabet,
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Select a word size for a sequence set
    pub fn select(&self, sequences: &[Sequence]) -> SccsResult<usize> {
        if sequences.is_empty() {
            return Err(SccsError::EmptyInput(
                "no sequences to select a word size from".to_string(),
            ));
        }

        let step = (sequences.len() / self.sample_size).max(1);
        let mut average = 0.0;
        let mut picked = 0usize;

        for sequence in sequences.iter().step_by(step).take(self.sample_size) {
            if sequence.len() < MIN_WORD_SIZE {
                warn!(
                    "Skipping {} for word size selection: only {} symbols",
                    sequence.entry,
                    sequence.len()
                );
                continue;
            }
            match self.pick_for(&sequence.sequence) {
                Ok(k) => {
                    picked += 1;
                    average += (k as f64 - average) / picked as f64;
                }
                Err(e) => warn!("Skipping {} for word size selection: {}", sequence.entry, e),
            }
        }

        if picked == 0 {
            warn!("No sampled sequence was usable, using word size {}", MIN_WORD_SIZE);
            return Ok(MIN_WORD_SIZE);
        }

        // Guard against the running average landing a hair above an integer
        let word_size = ((average - 1e-9).ceil() as usize).max(MIN_WORD_SIZE);
        debug!(
            "Selected word size {} from {} sampled sequences (mean pick {:.3})",
            word_size, picked, average
        );
        Ok(word_size)
    }

    /// Smallest k whose CRE falls below the cut, else the longest length evaluated
    pub fn pick_for(&self, symbols: &[u8]) -> SccsResult<usize> {
        let profile = self.cre_profile(symbols)?;
        Ok(profile
            .iter()
            .find(|(_, cre)| *cre < self.crecut)
            .or_else(|| profile.last())
            .map(|(k, _)| *k)
            .unwrap_or(MIN_WORD_SIZE))
    }

    /// `(k, CRE(k))` for every length evaluated on this sequence
    pub fn cre_profile(&self, symbols: &[u8]) -> SccsResult<Vec<(usize, f64)>> {
        let max_len = self
            .limit
            .min(self.supported_length(symbols.len()))
            .min(symbols.len());
        if max_len < MIN_WORD_SIZE {
            return Err(SccsError::InvalidWordSize {
                word_size: MIN_WORD_SIZE,
                length: symbols.len(),
            });
        }

        let entropies = (MIN_WORD_SIZE..=max_len)
            .map(|l| Ok((l, self.relative_entropy(symbols, l)?)))
            .collect::<SccsResult<Vec<(usize, f64)>>>()?;

        let mut cumulative = 0.0;
        let mut cre: Vec<(usize, f64)> = entropies
            .iter()
            .rev()
            .map(|&(l, re)| {
                cumulative += re;
                (l, cumulative)
            })
            .collect();
        cre.reverse();
        Ok(cre)
    }

    /// Longest word length whose one-longer words fit in `length` symbols
    fn supported_length(&self, length: usize) -> usize {
        let base = self.alphabet.size().max(2);
        let mut words = base * base;
        let mut l = 0;
        while words <= length {
            l += 1;
            words = words.saturating_mul(base);
            if words == usize::MAX {
                break;
            }
        }
        l.max(MIN_WORD_SIZE)
    }

    /// RE(l) in bits: observed l-mers against their (l-2)-order reconstruction,
    /// less the gain expected from sampling noise alone
    pub fn relative_entropy(&self, symbols: &[u8], l: usize) -> SccsResult<f64> {
        let observed = ProfileBuilder::new(l, self.alphabet)?.count_words(symbols)?;
        let shorter = ProfileBuilder::new(l - 1, self.alphabet)?
            .cross_boundary()
            .count_words(symbols)?;

        // c(m.*) including the padded boundary window, and c(m.b) for real b
        let mut marginals: IndexMap<Word, u64> = IndexMap::new();
        let mut successors: IndexMap<Word, Vec<(u8, u64)>> = IndexMap::new();
        for (word, &count) in &shorter {
            let (prefix, last) = word.split_at(l - 2);
            *marginals.entry(Word::from_slice(prefix)).or_insert(0) += count;
            if last[0] != BOUNDARY_PAD {
                successors
                    .entry(Word::from_slice(prefix))
                    .or_default()
                    .push((last[0], count));
            }
        }

        let mut expected: IndexMap<Word, f64> = IndexMap::new();
        let mut lefts: IndexMap<Word, usize> = IndexMap::new();
        for (word, &left) in &shorter {
            if word[l - 2] == BOUNDARY_PAD {
                continue;
            }
            let middle = &word[1..];
            let (Some(&marginal), Some(nexts)) = (marginals.get(middle), successors.get(middle))
            else {
                continue;
            };
            *lefts.entry(Word::from_slice(middle)).or_insert(0) += 1;
            for &(next, right) in nexts {
                let mut extended = word.clone();
                extended.push(next);
                *expected.entry(extended).or_insert(0.0) +=
                    left as f64 * right as f64 / marginal as f64;
            }
        }

        let normalizer: f64 = expected.values().sum();
        let total = observed.values().sum::<u64>() as f64;
        if !(normalizer > 0.0) {
            return Err(SccsError::EmptyInput(format!(
                "no expected {}-mers could be reconstructed",
                l
            )));
        }

        let mut re = 0.0;
        for (word, &count) in &observed {
            let p = count as f64 / total;
            // Every observed word has both of its (l-1)-mers observed
            let q = expected.get(word).copied().unwrap_or(0.0) / normalizer;
            if q > 0.0 {
                re += p * (p / q).log2();
            }
        }

        // Degrees of freedom of the per-middle independence tables
        let freedom: usize = lefts
            .iter()
            .filter_map(|(middle, &r)| successors.get(middle).map(|nexts| (r, nexts.len())))
            .map(|(r, c)| (r - 1) * (c - 1))
            .sum();
        let bias = freedom as f64 / (2.0 * total * std::f64::consts::LN_2);
        debug!("RE({}) = {:.4} bits before removing {:.4} of sampling bias", l, re, bias);

        Ok((re - bias).max(0.0))
    }
}
