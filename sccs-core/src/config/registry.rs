//! Genome database registry: database key -> directory of chromosome files

use crate::error::{SccsError, SccsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Explicit mapping from a genome database key to the directory holding its sequences.
///
/// Passed to sequence sources by value; there is no process-wide registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenomeRegistry {
    databases: BTreeMap<String, PathBuf>,
}

impl GenomeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.register(key, dir);
        self
    }

    pub fn register(&mut self, key: impl Into<String>, dir: impl Into<PathBuf>) {
        self.databases.insert(key.into(), dir.into());
    }

    /// Resolve a database key to its directory
    pub fn resolve(&self, key: &str) -> SccsResult<&Path> {
        self.databases
            .get(key)
            .map(PathBuf::as_path)
            .ok_or_else(|| {
                SccsError::NotFound(format!("Genome database '{}' is not registered", key))
            })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.databases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let registry = GenomeRegistry::new()
            .with("hg38", "/data/hg38")
            .with("mm10", "/data/mm10");

        assert_eq!(registry.resolve("hg38").unwrap(), Path::new("/data/hg38"));
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["hg38", "mm10"]);
    }

    #[test]
    fn test_unknown_key() {
        let registry = GenomeRegistry::new();
        match registry.resolve("dm6") {
            Err(SccsError::NotFound(msg)) => assert!(msg.contains("dm6")),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }
}
