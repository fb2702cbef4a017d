//! Test utilities for the SCCS workspace
//!
//! Shared fixtures (seeded Markov sources, mutated sequence families,
//! synthetic chromosomes) and isolated temporary environments.

pub mod environment;
pub mod fixtures;

pub use environment::TestEnvironment;
pub use fixtures::{
    create_test_fasta, mutate, random_dna, sequence_family, MarkovSource, TestGenome,
    TestSequence,
};

pub use anyhow::{Context, Result};
pub use tempfile;

/// Initialize test logging (safe to call from every test)
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Run a test with a clean environment
pub fn with_test_env<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&TestEnvironment) -> Result<R>,
{
    let env = TestEnvironment::new()?;
    f(&env)
}
