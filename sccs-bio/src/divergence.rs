//! Divergence measures between two profiles of the same word size.
//!
//! Degenerate comparisons (an empty profile, or a directional measure hitting
//! a word the reference never produces) do not fail: they score the measure's
//! sentinel, its maximal divergence.

use crate::profile::Profile;
use sccs_core::{DivergenceKind, SccsResult};
use std::fmt::Debug;

pub trait DivergenceMeasure: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    fn is_symmetric(&self) -> bool;

    /// Value reported when the comparison is degenerate
    fn sentinel(&self) -> f64;

    /// Divergence of `a` from `b`; errors only on word-size mismatch
    fn divergence(&self, a: &Profile, b: &Profile) -> SccsResult<f64>;
}

/// Jensen-Shannon divergence in bits, bounded to [0, 1]
#[derive(Debug, Clone, Copy, Default)]
pub struct JensenShannon;

#[inline]
fn js_term(p: f64, q: f64) -> f64 {
    // Contribution of one word to JS, written symmetrically in p and q
    let m = 0.5 * (p + q);
    let mut term = 0.0;
    if p > 0.0 {
        term += p * (p / m).log2();
    }
    if q > 0.0 {
        term += q * (q / m).log2();
    }
    0.5 * term
}

impl DivergenceMeasure for JensenShannon {
    fn name(&self) -> &'static str {
        "jensen-shannon"
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn sentinel(&self) -> f64 {
        1.0
    }

    fn divergence(&self, a: &Profile, b: &Profile) -> SccsResult<f64> {
        a.check_compatible(b)?;
        if a.is_empty() || b.is_empty() {
            return Ok(self.sentinel());
        }

        let mut total = 0.0;
        for (word, p) in a.iter() {
            total += js_term(p, b.probability(word));
        }
        for (word, q) in b.iter() {
            if a.probability(word) == 0.0 {
                total += js_term(0.0, q);
            }
        }

        if !total.is_finite() {
            return Ok(self.sentinel());
        }
        Ok(total.clamp(0.0, 1.0))
    }
}

/// Kullback-Leibler relative entropy of `a` against `b`, in bits
#[derive(Debug, Clone, Copy, Default)]
pub struct KullbackLeibler;

impl KullbackLeibler {
    /// Cap on reported divergence
    pub const SENTINEL: f64 = 64.0;
}

impl DivergenceMeasure for KullbackLeibler {
    fn name(&self) -> &'static str {
        "kullback-leibler"
    }

    fn is_symmetric(&self) -> bool {
        false
    }

    fn sentinel(&self) -> f64 {
        Self::SENTINEL
    }

    fn divergence(&self, a: &Profile, b: &Profile) -> SccsResult<f64> {
        a.check_compatible(b)?;
        if a.is_empty() || b.is_empty() {
            return Ok(self.sentinel());
        }

        let mut total = 0.0;
        for (word, p) in a.iter() {
            let q = b.probability(word);
            if q == 0.0 {
                return Ok(self.sentinel());
            }
            total += p * (p / q).log2();
        }

        if !total.is_finite() {
            return Ok(self.sentinel());
        }
        Ok(total.clamp(0.0, Self::SENTINEL))
    }
}

/// Measure selected by configuration
pub fn measure_for(kind: DivergenceKind) -> Box<dyn DivergenceMeasure> {
    match kind {
        DivergenceKind::JensenShannon => Box::new(JensenShannon),
        DivergenceKind::KullbackLeibler => Box::new(KullbackLeibler),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileBuilder;
    use sccs_core::{Alphabet, SccsError};

    fn profile(k: usize, symbols: &[u8]) -> Profile {
        ProfileBuilder::new(k, Alphabet::Nucleotide)
            .unwrap()
            .build_symbols(symbols)
            .unwrap()
    }

    #[test]
    fn test_js_identity_and_symmetry() {
        let a = profile(2, b"ACGTACGTTT");
        let b = profile(2, b"AAAACCCGTG");

        assert_eq!(JensenShannon.divergence(&a, &a).unwrap(), 0.0);
        let ab = JensenShannon.divergence(&a, &b).unwrap();
        let ba = JensenShannon.divergence(&b, &a).unwrap();
        assert!(ab > 0.0 && ab < 1.0);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn test_js_disjoint_support_is_maximal() {
        let a = profile(2, b"AAAA");
        let b = profile(2, b"CCCC");
        assert!((JensenShannon.divergence(&a, &b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_js_known_value() {
        // P = {A: 1}, Q = {A: .5, C: .5}, M = {A: .75, C: .25}
        let a = profile(1, b"AA");
        let b = profile(1, b"AC");
        let expected = 0.5 * ((1.0f64 / 0.75).log2()) + 0.25 * ((0.5f64 / 0.75).log2())
            + 0.25 * ((0.5f64 / 0.25).log2());
        assert!((JensenShannon.divergence(&a, &b).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kl_directional_and_sentinel() {
        let a = profile(1, b"AC");
        let b = profile(1, b"AACG");

        let ab = KullbackLeibler.divergence(&a, &b).unwrap();
        assert!(ab > 0.0);
        // b has G, which a never produces
        assert_eq!(
            KullbackLeibler.divergence(&b, &a).unwrap(),
            KullbackLeibler::SENTINEL
        );
        assert!(!KullbackLeibler.is_symmetric());
    }

    #[test]
    fn test_word_size_mismatch() {
        let a = profile(2, b"ACGT");
        let b = profile(3, b"ACGT");
        for kind in [DivergenceKind::JensenShannon, DivergenceKind::KullbackLeibler] {
            assert!(matches!(
                measure_for(kind).divergence(&a, &b),
                Err(SccsError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_measure_for_kind() {
        assert_eq!(measure_for(DivergenceKind::JensenShannon).name(), "jensen-shannon");
        assert_eq!(measure_for(DivergenceKind::KullbackLeibler).sentinel(), 64.0);
    }
}
