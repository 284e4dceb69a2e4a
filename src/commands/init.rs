//! Init command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::writer::write_file_atomic;

/// Run the init command
pub async fn run(force: bool, config_path: &Path) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file {:?} already exists (use --force to overwrite)",
            config_path
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }

    write_file_atomic(config_path, Config::generate_default_yaml().as_bytes())
        .with_context(|| format!("Failed to write config file {:?}", config_path))?;

    info!("Default configuration written to {:?}", config_path);
    println!("[OK] Created {}", config_path.display());

    Ok(())
}
