//! Configuration types for SCCS

pub mod registry;

pub use registry::GenomeRegistry;

use crate::error::{SccsError, SccsResult};
use crate::types::{Alphabet, DivergenceKind, Tail};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub word_size: WordSizeConfig,
    #[serde(default)]
    pub divergence: DivergenceConfig,
    #[serde(default)]
    pub cutpoint: CutpointConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub genomes: GenomeRegistry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileConfig {
    #[serde(default)]
    pub alphabet: Alphabet,
    /// Fixed word size; selected per run via CRE when unset
    #[serde(default)]
    pub word_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordSizeConfig {
    /// Number of sequences sampled for word-size selection
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Longest word length considered
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// CRE threshold in bits
    #[serde(default = "default_crecut")]
    pub crecut: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DivergenceConfig {
    #[serde(default)]
    pub measure: DivergenceKind,
}

/// A (Dy, Mre) pair: CDF offset above the median and maximum admissible divergence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CutpointBounds {
    pub dy: f64,
    pub mre: f64,
}

impl CutpointBounds {
    pub const fn new(dy: f64, mre: f64) -> Self {
        Self { dy, mre }
    }

    pub fn validate(&self) -> SccsResult<()> {
        if !(-0.5..=0.5).contains(&self.dy) {
            return Err(SccsError::InvalidParameter(format!(
                "Dy must lie in [-0.5, 0.5], got {}",
                self.dy
            )));
        }
        if !(self.mre.is_finite() && self.mre >= 0.0) {
            return Err(SccsError::InvalidParameter(format!(
                "Mre must be a non-negative number, got {}",
                self.mre
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CutpointConfig {
    /// Fixed bounds for the hit-only phase
    #[serde(default = "default_hit_only_bounds")]
    pub hit_only: CutpointBounds,
    #[serde(default)]
    pub tail: Tail,
    /// Context-phase bounds indexed by run; runs past the end reuse the last entry
    #[serde(default = "default_presets")]
    pub presets: Vec<CutpointBounds>,
}

impl CutpointConfig {
    pub fn preset_for_run(&self, run: usize) -> CutpointBounds {
        self.presets
            .get(run)
            .or_else(|| self.presets.last())
            .copied()
            .unwrap_or(self.hit_only)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusteringConfig {
    /// Smallest neighbor count tried; defaults to max(4, ceil(0.1 N))
    #[serde(default)]
    pub k_min: Option<usize>,
    /// Largest neighbor count tried; defaults to min(N - 1, k_min + k_span)
    #[serde(default)]
    pub k_max: Option<usize>,
    #[serde(default = "default_k_span")]
    pub k_span: usize,
    /// Components smaller than this are treated as outliers
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceConfig {
    /// Worker threads (0 = all available cores)
    #[serde(default)]
    pub threads: usize,
    #[serde(default)]
    pub show_progress: bool,
}

// Default value functions
fn default_sample_size() -> usize { 50 }
fn default_limit() -> usize { 12 }
fn default_crecut() -> f64 { 0.10 }
fn default_hit_only_bounds() -> CutpointBounds { CutpointBounds::new(0.4, 0.7) }
fn default_presets() -> Vec<CutpointBounds> {
    vec![
        CutpointBounds::new(0.40, 0.70),
        CutpointBounds::new(0.45, 0.85),
        CutpointBounds::new(0.48, 0.935),
    ]
}
fn default_k_span() -> usize { 10 }
fn default_min_cluster_size() -> usize { 2 }

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            word_size: None,
        }
    }
}

impl Default for WordSizeConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            limit: default_limit(),
            crecut: default_crecut(),
        }
    }
}

impl Default for CutpointConfig {
    fn default() -> Self {
        Self {
            hit_only: default_hit_only_bounds(),
            tail: Tail::default(),
            presets: default_presets(),
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            k_min: None,
            k_max: None,
            k_span: default_k_span(),
            min_cluster_size: default_min_cluster_size(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            show_progress: false,
        }
    }
}

impl Config {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> SccsResult<()> {
        if let Some(0) = self.profile.word_size {
            return Err(SccsError::InvalidParameter(
                "profile.word_size must be positive".to_string(),
            ));
        }
        if self.word_size.limit < 3 {
            return Err(SccsError::InvalidParameter(format!(
                "word_size.limit must be at least 3, got {}",
                self.word_size.limit
            )));
        }
        if self.word_size.sample_size == 0 {
            return Err(SccsError::InvalidParameter(
                "word_size.sample_size must be positive".to_string(),
            ));
        }
        if !(self.word_size.crecut > 0.0) {
            return Err(SccsError::InvalidParameter(format!(
                "word_size.crecut must be positive, got {}",
                self.word_size.crecut
            )));
        }

        self.cutpoint.hit_only.validate()?;
        for preset in &self.cutpoint.presets {
            preset.validate()?;
        }

        if self.clustering.min_cluster_size == 0 {
            return Err(SccsError::InvalidParameter(
                "clustering.min_cluster_size must be positive".to_string(),
            ));
        }
        if let (Some(lo), Some(hi)) = (self.clustering.k_min, self.clustering.k_max) {
            if lo == 0 || lo > hi {
                return Err(SccsError::InvalidParameter(format!(
                    "clustering k range [{}, {}] is empty",
                    lo, hi
                )));
            }
        }
        Ok(())
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, SccsError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| SccsError::Configuration(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), SccsError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| SccsError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
