//! Sequence alphabets used for k-mer profiling

use crate::error::SccsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alphabet a sequence is reduced to before profiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alphabet {
    /// A, C, G, T (U folded onto T)
    Nucleotide,
    /// Purine/pyrimidine reduction: A, G -> R and C, T, U -> Y
    #[serde(alias = "ry")]
    Purine,
}

impl Alphabet {
    /// Map a raw symbol into this alphabet; `None` for symbols outside it
    #[inline]
    pub fn encode(&self, symbol: u8) -> Option<u8> {
        let upper = symbol.to_ascii_uppercase();
        match self {
            Alphabet::Nucleotide => match upper {
                b'A' | b'C' | b'G' | b'T' => Some(upper),
                b'U' => Some(b'T'),
                _ => None,
            },
            Alphabet::Purine => match upper {
                b'A' | b'G' | b'R' => Some(b'R'),
                b'C' | b'T' | b'U' | b'Y' => Some(b'Y'),
                _ => None,
            },
        }
    }

    pub fn symbols(&self) -> &'static [u8] {
        match self {
            Alphabet::Nucleotide => b"ACGT",
            Alphabet::Purine => b"RY",
        }
    }

    pub fn size(&self) -> usize {
        self.symbols().len()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::Nucleotide
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alphabet::Nucleotide => write!(f, "nucleotide"),
            Alphabet::Purine => write!(f, "purine"),
        }
    }
}

impl FromStr for Alphabet {
    type Err = SccsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nucleotide" | "dna" | "nt" => Ok(Alphabet::Nucleotide),
            "purine" | "ry" | "purine-pyrimidine" => Ok(Alphabet::Purine),
            other => Err(SccsError::InvalidParameter(format!(
                "Unknown alphabet: {}",
                other
            ))),
        }
    }
}
