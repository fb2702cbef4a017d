use std::path::PathBuf;
use std::sync::OnceLock;

// Cache the paths to avoid repeated environment lookups
static SCCS_HOME: OnceLock<PathBuf> = OnceLock::new();

/// Get the SCCS home directory
/// Checks SCCS_HOME environment variable, falls back to ${HOME}/.sccs
pub fn sccs_home() -> PathBuf {
    SCCS_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("SCCS_HOME") {
                PathBuf::from(path)
            } else {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".sccs")
            }
        })
        .clone()
}

/// Default configuration file: SCCS_HOME/config.toml
pub fn default_config_path() -> PathBuf {
    sccs_home().join("config.toml")
}

/// Human-readable summary of the resolved paths
pub fn describe_paths() -> String {
    format!(
        "SCCS paths:\n  home:   {}\n  config: {}",
        sccs_home().display(),
        default_config_path().display()
    )
}
