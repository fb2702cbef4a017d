pub mod commands;
pub mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sccs_core::{default_config_path, load_config, Config};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "sccs",
    version,
    about = "Alignment-free selection of conserved sequence contexts",
    long_about = "SCCS ranks candidate genomic regions by the divergence of their k-mer \
                  profiles from a seed family, first on the hits alone and then with \
                  their flanking context, and clusters seed sets into homogeneous \
                  sub-contexts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = config value, else all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,

    /// Configuration file (defaults to $SCCS_HOME/config.toml)
    #[arg(long, global = true, value_name = "FILE", env = "SCCS_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select a k-mer word size from conditional relative entropy
    Wordsize(commands::wordsize::WordsizeArgs),

    /// Place a cutpoint in a list of divergence scores
    Cutpoint(commands::cutpoint::CutpointArgs),

    /// Cluster sequences into homogeneous sub-contexts
    Cluster(commands::cluster::ClusterArgs),

    /// Classify candidate regions against a seed family
    Classify(commands::classify::ClassifyArgs),

    /// Show or initialize the configuration
    Config(commands::config::ConfigArgs),
}

/// The explicit config file, else the default one when it exists, else built-in defaults
pub fn load_settings(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Ok(load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?),
        None => {
            let path = default_config_path();
            if path.is_file() {
                tracing::debug!("Loading config from {}", path.display());
                Ok(load_config(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?)
            } else {
                Ok(Config::default())
            }
        }
    }
}
