pub mod persist;

pub use officepdf_core::config::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    expand_paths(&mut config);

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./officepdf.toml",
        "~/.config/officepdf/config.toml",
        "/etc/officepdf/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    // Return default config if no file found
    let mut config = Config::default();
    expand_paths(&mut config);
    Ok(config)
}

/// Expand `~` in user-facing paths.
fn expand_paths(config: &mut Config) {
    config.output.dir = expand(&config.output.dir);
    if let Some(ref path) = config.converter.path {
        config.converter.path = Some(expand(path));
    }
}

pub fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    config.check()?;

    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    Ok(())
}
