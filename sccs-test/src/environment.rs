//! Isolated test environments with automatic cleanup

use crate::fixtures::{create_test_fasta, TestGenome, TestSequence};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary working tree, removed on drop
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("sccs-test")
            .context("Failed to create temporary directory")?;
        std::fs::create_dir_all(temp_dir.path().join("genomes"))?;
        std::fs::create_dir_all(temp_dir.path().join("out"))?;
        Ok(Self { temp_dir })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Default output directory
    pub fn out_dir(&self) -> PathBuf {
        self.path("out")
    }

    pub fn write_file(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn write_fasta(&self, relative: &str, sequences: &[TestSequence]) -> Result<PathBuf> {
        self.write_file(relative, &create_test_fasta(sequences))
    }

    /// Write chromosomes into `genomes/<key>/` and return that directory
    pub fn write_genome(&self, key: &str, chromosomes: &[&TestGenome]) -> Result<PathBuf> {
        let dir = self.path("genomes").join(key);
        std::fs::create_dir_all(&dir)?;
        for chromosome in chromosomes {
            std::fs::write(
                dir.join(format!("{}.fa", chromosome.name)),
                chromosome.to_fasta(),
            )?;
        }
        Ok(dir)
    }

    pub fn read_to_string(&self, relative: &str) -> Result<String> {
        let path = self.path(relative);
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() {
        let root = {
            let env = TestEnvironment::new().unwrap();
            assert!(env.out_dir().is_dir());
            env.write_file("nested/a.txt", "hello").unwrap();
            assert_eq!(env.read_to_string("nested/a.txt").unwrap(), "hello");
            env.root().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[test]
    fn test_write_genome() {
        let env = TestEnvironment::new().unwrap();
        let mut genome = TestGenome::new("chr1", 1);
        genome.spacer(20);

        let dir = env.write_genome("toy", &[&genome]).unwrap();
        let contents = std::fs::read_to_string(dir.join("chr1.fa")).unwrap();
        assert!(contents.starts_with(">chr1\n"));
    }
}
