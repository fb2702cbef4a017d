/// Core types shared across all SCCS crates
pub mod alphabet;
pub mod entry;
pub mod measure;

pub use alphabet::Alphabet;
pub use entry::{EntryRef, Strand};
pub use measure::{DivergenceKind, Tail};
