//! Sources command implementation.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;

/// Run the sources command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let sources = config.rule_sources();

    if sources.is_empty() {
        println!("No sources configured.");
        return Ok(());
    }

    println!("{:<8} {:<10} LOCATOR", "KIND", "TRUST");
    for source in &sources {
        println!(
            "{:<8} {:<10} {}",
            source.kind().to_string(),
            source.trust().to_string(),
            source.locator()
        );
    }

    println!();
    println!(
        "Whitelist: {} inline entries, {} files",
        config.whitelist.len(),
        config.whitelist_files.len()
    );
    println!("Output: {}", config.output.display());

    Ok(())
}
