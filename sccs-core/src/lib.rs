//! Core utilities and types shared across all SCCS crates

pub mod config;
pub mod error;
pub mod system;
pub mod types;

// Re-export commonly used types
pub use config::{
    load_config, save_config, ClusteringConfig, Config, CutpointBounds, CutpointConfig,
    GenomeRegistry, WordSizeConfig,
};
pub use error::{SccsError, SccsResult};
pub use types::{Alphabet, DivergenceKind, EntryRef, Strand, Tail};

pub use system::{configure_thread_pool, default_config_path, sccs_home};

/// Version information for the SCCS project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
