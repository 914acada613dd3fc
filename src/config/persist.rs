//! Configuration persistence using toml_edit so written files carry comments.

use super::Config;
use anyhow::{Context, Result};
use std::path::Path;
use toml_edit::DocumentMut;

const SECTION_COMMENTS: &[(&str, &str)] = &[
    (
        "converter",
        "# Converter engine. `binary` is looked up on PATH unless `path` points at an existing executable.\n",
    ),
    (
        "output",
        "\n# Where PDFs are written. `create` is one of: ask, always, never.\n",
    ),
    (
        "queue",
        "\n# Accepted input extensions and display label length.\n",
    ),
];

/// Render `config` as a commented TOML document.
pub fn render_config(config: &Config) -> Result<String> {
    let content = toml::to_string_pretty(config).with_context(|| "Failed to serialize config")?;
    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| "Failed to parse serialized config")?;

    for (section, comment) in SECTION_COMMENTS {
        if let Some(table) = doc.get_mut(section).and_then(|item| item.as_table_mut()) {
            table.decor_mut().set_prefix(*comment);
        }
    }

    Ok(doc.to_string())
}

/// Write `config` to `path`, creating parent directories. Refuses to replace
/// an existing file unless `overwrite` is set.
pub fn save_config(path: &Path, config: &Config, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        anyhow::bail!("Config file already exists: {:?} (use --force to replace it)", path);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    std::fs::write(path, render_config(config)?)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}
