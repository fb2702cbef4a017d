//! Sequence handling and k-mer profiling for SCCS

pub mod divergence;
pub mod formats;
pub mod profile;
pub mod sequence;
pub mod source;

// Re-export commonly used types
pub use divergence::{measure_for, DivergenceMeasure, JensenShannon, KullbackLeibler};
pub use profile::{
    hybrid_profile, HybridAccumulator, Profile, ProfileBuilder, ProfileInput, Windowing,
    WordSizeSelector, MIN_WORD_SIZE,
};
pub use sequence::{reverse_complement, Sequence};
pub use source::{extract_region, GenomeSource, MemorySequenceSource, SequenceSource};
// Re-export format functions
pub use formats::{parse_fasta, read_entries, write_entries, write_fasta};
