//! Candidate classification and seed clustering for SCCS

pub mod candidates;
pub mod clustering;
pub mod cutpoint;
pub mod progress;
pub mod render;

pub use candidates::{
    resolve_context_size, CandidateOptions, CandidateSetEngine, CandidateSets, FinalFiles,
    OutputTarget, PhaseResult,
};
pub use clustering::{cluster_profiles, krnn_cluster, ClusterOptions, ClusterTrial, DistanceMatrix};
pub use cutpoint::{classify, cutoff_value, select_cutpoint, Classification, Partition, ScoredEntry};
pub use render::{CsvRenderer, NullRenderer, Renderer, Series};
