use crate::cli::output::*;
use anyhow::Result;
use clap::Args;
use sccs_core::system::describe_paths;
use sccs_core::{default_config_path, save_config, Config, SccsError};
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the default configuration
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,

    /// Print the resolved home and config paths
    #[arg(long)]
    pub paths: bool,
}

pub fn run(args: ConfigArgs, explicit: Option<&Path>) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    if args.paths {
        println!("{}", describe_paths());
        return Ok(());
    }

    if args.init {
        if path.exists() && !args.force {
            return Err(SccsError::Configuration(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            ))
            .into());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SccsError::from)?;
        }
        save_config(&path, &Config::default())?;
        status(Status::Done, &format!("Wrote default configuration to {}", path.display()));
        return Ok(());
    }

    let config = crate::cli::load_settings(explicit)?;
    if !path.is_file() {
        status(Status::Note, &format!("{} not found, showing defaults", path.display()));
    }
    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| SccsError::Serialization(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}
