mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = ["./framelift.toml", "~/.config/framelift/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.encode.video_bitrate.is_empty() {
        anyhow::bail!("Video bitrate cannot be empty");
    }

    let threads = config.interpolation.threads;
    if threads != 0 && !(2..=16).contains(&threads) {
        anyhow::bail!(
            "Interpolation threads must be 0 (auto) or between 2 and 16, got {}",
            threads
        );
    }

    if config.interpolation.model.is_empty() {
        anyhow::bail!("Interpolation model cannot be empty");
    }

    if let Some(ref dir) = config.tools.dir {
        if !dir.exists() {
            tracing::warn!("Tools directory does not exist: {:?}", dir);
        }
    }

    Ok(())
}
