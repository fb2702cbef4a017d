use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use sccs_core::{Config, SccsError};

fn main() {
    let cli = Cli::parse();

    // SCCS_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("SCCS_LOG").unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(exit_code(&e));
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<SccsError>() {
        Some(SccsError::Configuration(_)) => 2,
        Some(SccsError::Io(_)) => 3,
        Some(SccsError::Parse(_)) => 4,
        Some(err) if err.is_invalid_parameter() => 5,
        Some(SccsError::EmptyInput(_)) => 6,
        Some(SccsError::MissingAnnotation(_)) => 7,
        _ => 1,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config;
    let threads = cli.threads;

    // `config` handles its own file and needs no thread pool
    let settings = || -> anyhow::Result<Config> {
        let mut config = crate::cli::load_settings(config_path.as_deref())?;
        if threads > 0 {
            config.performance.threads = threads;
        }
        let threads = sccs_core::configure_thread_pool(config.performance.threads)?;
        tracing::debug!("Using {} threads", threads);
        Ok(config)
    };

    match cli.command {
        Commands::Wordsize(args) => crate::cli::commands::wordsize::run(args, &settings()?),
        Commands::Cutpoint(args) => crate::cli::commands::cutpoint::run(args, &settings()?),
        Commands::Cluster(args) => crate::cli::commands::cluster::run(args, &settings()?),
        Commands::Classify(args) => crate::cli::commands::classify::run(args, settings()?),
        Commands::Config(args) => crate::cli::commands::config::run(args, config_path.as_deref()),
    }
}
