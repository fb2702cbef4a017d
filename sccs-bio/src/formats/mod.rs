pub mod annotation;
pub mod entries;
pub mod fasta;

pub use annotation::{read_context_size, write_context_size, CONTEXT_SIZE_TAG};
pub use entries::{read_entries, write_entries};
pub use fasta::{parse_fasta, parse_fasta_from_bytes, write_fasta};
