//! Entry references: the identity of a sequence region across a run

use crate::error::SccsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strand of a genomic region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
    #[serde(rename = ".")]
    Unknown,
}

impl Strand {
    pub fn symbol(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unknown => '.',
        }
    }
}

impl Default for Strand {
    fn default() -> Self {
        Strand::Unknown
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Strand {
    type Err = SccsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "1" | "plus" => Ok(Strand::Forward),
            "-" | "-1" | "minus" => Ok(Strand::Reverse),
            "." | "" | "?" => Ok(Strand::Unknown),
            other => Err(SccsError::Parse(format!("Unknown strand: {}", other))),
        }
    }
}

/// Reference to a sequence region: name plus 0-based half-open range and strand
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryRef {
    pub name: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
}

impl EntryRef {
    pub fn new(name: impl Into<String>, start: u64, end: u64, strand: Strand) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            strand,
        }
    }

    /// Entry covering a whole sequence of the given length
    pub fn whole(name: impl Into<String>, length: u64) -> Self {
        Self::new(name, 0, length, Strand::Unknown)
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widen the range by `delta` on both sides; the start saturates at zero
    pub fn extended(&self, delta: u64) -> Self {
        Self {
            name: self.name.clone(),
            start: self.start.saturating_sub(delta),
            end: self.end.saturating_add(delta),
            strand: self.strand,
        }
    }

    /// Interpret a FASTA identifier, falling back to a whole-sequence entry
    pub fn from_header(id: &str, length: u64) -> Self {
        id.parse()
            .unwrap_or_else(|_| Self::whole(id.to_string(), length))
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}({})",
            self.name, self.start, self.end, self.strand
        )
    }
}

impl FromStr for EntryRef {
    type Err = SccsError;

    /// Parses `name:start-end`, optionally followed by `(strand)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (body, strand) = match s.strip_suffix(')').and_then(|b| b.rsplit_once('(')) {
            Some((body, strand)) => (body, strand.parse()?),
            None => (s, Strand::Unknown),
        };

        let (name, range) = body
            .rsplit_once(':')
            .ok_or_else(|| SccsError::Parse(format!("Missing coordinate range in '{}'", s)))?;
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| SccsError::Parse(format!("Malformed range in '{}'", s)))?;

        let start: u64 = start
            .parse()
            .map_err(|_| SccsError::Parse(format!("Bad start coordinate in '{}'", s)))?;
        let end: u64 = end
            .parse()
            .map_err(|_| SccsError::Parse(format!("Bad end coordinate in '{}'", s)))?;

        if name.is_empty() {
            return Err(SccsError::Parse(format!("Empty entry name in '{}'", s)));
        }
        if end < start {
            return Err(SccsError::Parse(format!("End before start in '{}'", s)));
        }

        Ok(Self::new(name, start, end, strand))
    }
}
