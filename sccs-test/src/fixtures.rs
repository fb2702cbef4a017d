//! Test fixtures: synthetic sequences with known statistical structure
//!
//! All generators take an explicit seed so tests stay deterministic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sccs_core::{EntryRef, Strand};

const BASES: [u8; 4] = *b"ACGT";

/// Test sequence with a FASTA identifier
#[derive(Debug, Clone, PartialEq)]
pub struct TestSequence {
    pub id: String,
    pub sequence: Vec<u8>,
}

impl TestSequence {
    pub fn new(id: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    pub fn to_fasta(&self) -> String {
        let mut fasta = format!(">{}\n", self.id);
        for chunk in self.sequence.chunks(60) {
            fasta.push_str(&String::from_utf8_lossy(chunk));
            fasta.push('\n');
        }
        fasta
    }
}

/// Create FASTA file content
pub fn create_test_fasta(sequences: &[TestSequence]) -> String {
    sequences.iter().map(|s| s.to_fasta()).collect()
}

/// Uniform random DNA
pub fn random_dna(length: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..length).map(|_| BASES[rng.gen_range(0..4)]).collect()
}

/// Fixed-order Markov source over A, C, G, T
///
/// Each context of `order` preceding bases favors one next base with
/// probability `bias`; the remaining mass is spread over the other three.
#[derive(Debug, Clone)]
pub struct MarkovSource {
    order: usize,
    transitions: Vec<[f64; 4]>,
}

impl MarkovSource {
    pub fn random(order: usize, bias: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let contexts = 4usize.pow(order as u32);
        let other = (1.0 - bias) / 3.0;

        let transitions = (0..contexts)
            .map(|_| {
                let preferred = rng.gen_range(0..4);
                let mut probs = [other; 4];
                probs[preferred] = bias;
                probs
            })
            .collect();

        Self { order, transitions }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    fn context_index(context: &[u8]) -> usize {
        context.iter().fold(0, |acc, &b| {
            let code = BASES.iter().position(|&x| x == b).unwrap_or(0);
            acc * 4 + code
        })
    }

    pub fn generate(&self, length: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sequence: Vec<u8> = (0..self.order.min(length))
            .map(|_| BASES[rng.gen_range(0..4)])
            .collect();

        while sequence.len() < length {
            let context = &sequence[sequence.len() - self.order..];
            let probs = &self.transitions[Self::context_index(context)];

            let draw: f64 = rng.gen();
            let mut cumulative = 0.0;
            let mut next = BASES[3];
            for (i, p) in probs.iter().enumerate() {
                cumulative += p;
                if draw < cumulative {
                    next = BASES[i];
                    break;
                }
            }
            sequence.push(next);
        }
        sequence
    }
}

/// Copy `sequence` with each position substituted at `rate`
pub fn mutate(sequence: &[u8], rate: f64, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    sequence
        .iter()
        .map(|&base| {
            if rng.gen_bool(rate) {
                let mut replacement = BASES[rng.gen_range(0..4)];
                while replacement == base {
                    replacement = BASES[rng.gen_range(0..4)];
                }
                replacement
            } else {
                base
            }
        })
        .collect()
}

/// Mutated copies of one ancestor drawn from `source`
pub fn sequence_family(
    prefix: &str,
    source: &MarkovSource,
    count: usize,
    length: usize,
    mutation_rate: f64,
    seed: u64,
) -> Vec<TestSequence> {
    let ancestor = source.generate(length, seed);
    (0..count)
        .map(|i| {
            TestSequence::new(
                format!("{}_{}", prefix, i),
                mutate(&ancestor, mutation_rate, seed.wrapping_add(1 + i as u64)),
            )
        })
        .collect()
}

fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence
        .iter()
        .rev()
        .map(|&b| match b {
            b'A' => b'T',
            b'T' => b'A',
            b'C' => b'G',
            b'G' => b'C',
            other => other,
        })
        .collect()
}

/// A synthetic chromosome with known regions placed in it
#[derive(Debug, Clone)]
pub struct TestGenome {
    pub name: String,
    pub sequence: Vec<u8>,
    rng: StdRng,
}

impl TestGenome {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            sequence: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Append uniform random bases
    pub fn spacer(&mut self, length: usize) -> &mut Self {
        for _ in 0..length {
            let base = BASES[self.rng.gen_range(0..4)];
            self.sequence.push(base);
        }
        self
    }

    /// Append bases verbatim and return their coordinates
    pub fn append(&mut self, symbols: &[u8]) -> EntryRef {
        self.insert(symbols, Strand::Forward)
    }

    /// Place `symbols` so that fetching the returned entry on `strand` yields them
    pub fn insert(&mut self, symbols: &[u8], strand: Strand) -> EntryRef {
        let start = self.sequence.len() as u64;
        match strand {
            Strand::Reverse => self.sequence.extend(reverse_complement(symbols)),
            _ => self.sequence.extend_from_slice(symbols),
        }
        EntryRef::new(self.name.clone(), start, self.sequence.len() as u64, strand)
    }

    pub fn to_fasta(&self) -> String {
        TestSequence::new(self.name.clone(), self.sequence.clone()).to_fasta()
    }
}
