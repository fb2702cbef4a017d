//! Selectable measures and partition modes

use crate::error::SccsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which divergence measure compares two profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DivergenceKind {
    /// Symmetric, bounded to [0, 1]
    JensenShannon,
    /// Directional relative entropy of the first profile against the second
    KullbackLeibler,
}

impl Default for DivergenceKind {
    fn default() -> Self {
        DivergenceKind::JensenShannon
    }
}

impl fmt::Display for DivergenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivergenceKind::JensenShannon => write!(f, "jensen-shannon"),
            DivergenceKind::KullbackLeibler => write!(f, "kullback-leibler"),
        }
    }
}

impl FromStr for DivergenceKind {
    type Err = SccsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jensen-shannon" | "js" | "jsd" => Ok(DivergenceKind::JensenShannon),
            "kullback-leibler" | "kl" | "relative-entropy" => Ok(DivergenceKind::KullbackLeibler),
            other => Err(SccsError::InvalidParameter(format!(
                "Unknown divergence measure: {}",
                other
            ))),
        }
    }
}

/// Which end of a divergence-sorted list is kept as the positive set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tail {
    /// Lowest divergences are good
    Low,
    /// Highest divergences are good
    High,
    /// Rejected entries are trimmed evenly from both ends
    TwoTailed,
}

impl Default for Tail {
    fn default() -> Self {
        Tail::Low
    }
}

impl fmt::Display for Tail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tail::Low => write!(f, "low"),
            Tail::High => write!(f, "high"),
            Tail::TwoTailed => write!(f, "two-tailed"),
        }
    }
}

impl FromStr for Tail {
    type Err = SccsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Tail::Low),
            "high" => Ok(Tail::High),
            "two-tailed" | "two_tailed" | "both" => Ok(Tail::TwoTailed),
            other => Err(SccsError::InvalidParameter(format!("Unknown tail: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!(
            "JS".parse::<DivergenceKind>().unwrap(),
            DivergenceKind::JensenShannon
        );
        assert_eq!(
            "kl".parse::<DivergenceKind>().unwrap(),
            DivergenceKind::KullbackLeibler
        );
        assert_eq!("both".parse::<Tail>().unwrap(), Tail::TwoTailed);
        assert!("middle".parse::<Tail>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for kind in [DivergenceKind::JensenShannon, DivergenceKind::KullbackLeibler] {
            assert_eq!(kind.to_string().parse::<DivergenceKind>().unwrap(), kind);
        }
        for tail in [Tail::Low, Tail::High, Tail::TwoTailed] {
            assert_eq!(tail.to_string().parse::<Tail>().unwrap(), tail);
        }
    }
}
