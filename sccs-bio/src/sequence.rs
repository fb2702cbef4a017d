use sccs_core::{EntryRef, Strand};
use serde::{Deserialize, Serialize};

/// A sequence region and its symbols
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub entry: EntryRef,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl Sequence {
    pub fn new(entry: EntryRef, sequence: Vec<u8>) -> Self {
        Self {
            entry,
            description: None,
            sequence,
        }
    }

    /// Build from a FASTA identifier, parsing `name:start-end(strand)` when present
    pub fn from_id(id: &str, sequence: Vec<u8>) -> Self {
        let entry = EntryRef::from_header(id, sequence.len() as u64);
        Self::new(entry, sequence)
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn header(&self) -> String {
        match &self.description {
            Some(desc) => format!(">{} {}", self.entry, desc),
            None => format!(">{}", self.entry),
        }
    }

    /// Orient the symbols to the entry strand
    pub fn oriented(mut self) -> Self {
        if self.entry.strand == Strand::Reverse {
            self.sequence = reverse_complement(&self.sequence);
        }
        self
    }
}

/// Reverse complement over IUPAC nucleotide symbols; unknown symbols are kept as-is
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence.iter().rev().map(|&b| complement(b)).collect()
}

#[inline]
fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' | b'U' => b'A',
        b'G' => b'C',
        b'C' => b'G',
        b'a' => b't',
        b't' | b'u' => b'a',
        b'g' => b'c',
        b'c' => b'g',
        b'R' => b'Y',
        b'Y' => b'R',
        b'r' => b'y',
        b'y' => b'r',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"ATGCN"), b"NGCAT".to_vec());
        assert_eq!(reverse_complement(b"acgt"), b"acgt".to_vec());
        assert_eq!(reverse_complement(b"RRY"), b"RYY".to_vec());
    }

    #[test]
    fn test_from_id_parses_coordinates() {
        let seq = Sequence::from_id("chr1:10-14(-)", b"ACGT".to_vec());
        assert_eq!(seq.entry.name, "chr1");
        assert_eq!(seq.entry.strand, Strand::Reverse);

        let plain = Sequence::from_id("read_9", b"ACGT".to_vec());
        assert_eq!(plain.entry, EntryRef::whole("read_9", 4));
    }

    #[test]
    fn test_oriented_reverse_strand() {
        let seq = Sequence::new(
            EntryRef::new("chr1", 0, 4, Strand::Reverse),
            b"AACG".to_vec(),
        );
        assert_eq!(seq.oriented().sequence, b"CGTT".to_vec());
    }

    #[test]
    fn test_header_with_description() {
        let seq = Sequence::from_id("chr1:0-4(+)", b"ACGT".to_vec())
            .with_description("seed".to_string());
        assert_eq!(seq.header(), ">chr1:0-4(+) seed");
    }
}
