//! Build command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::aggregator::{AggregationReport, Aggregator};
use crate::config::Config;
use crate::fetcher::{Fetcher, SourceStatus};
use crate::utils::format_count;
use crate::writer::write_rule_file;

/// Run the build command
pub async fn run(output: Option<PathBuf>, dry_run: bool, config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    let sources = config.rule_sources();
    if sources.is_empty() {
        warn!("No sources configured. The rule file will be empty.");
    }

    let whitelist = config.load_whitelist();
    info!(
        "Building blacklist from {} sources ({} whitelist entries)...",
        sources.len(),
        format_count(whitelist.len())
    );

    let aggregator = Aggregator::new(Fetcher::with_config(&config.fetch)?);
    let report = aggregator.run(&sources, &whitelist).await;

    print_report(&report);

    if report.failed_count() > 0 {
        warn!(
            "{} of {} sources failed to load",
            report.failed_count(),
            report.sources.len()
        );
    }

    if dry_run {
        println!();
        println!(
            "[DRY-RUN] {} rules would be written",
            format_count(report.rules.len())
        );
        return Ok(());
    }

    let output = output.unwrap_or(config.output);
    write_rule_file(&output, &report.rules)
        .with_context(|| format!("Failed to write rule file {:?}", output))?;

    println!();
    println!(
        "[OK] {} rules written to {}",
        format_count(report.rules.len()),
        output.display()
    );

    Ok(())
}

fn print_report(report: &AggregationReport) {
    println!();
    println!("Sources:");
    for entry in &report.sources {
        match &entry.status {
            SourceStatus::Loaded => println!(
                "  [OK]   {} ({}, {} lines, {} names)",
                entry.source,
                entry.source.trust(),
                format_count(entry.line_count),
                format_count(entry.name_count)
            ),
            SourceStatus::Skipped => println!("  [SKIP] {} (not found)", entry.source),
            SourceStatus::Failed(e) => println!("  [FAIL] {} ({})", entry.source, e),
        }
    }
    println!();
    println!(
        "Merged: {}  Whitelisted: {}  Final: {}",
        format_count(report.merged_count),
        format_count(report.whitelisted_count()),
        format_count(report.rules.len())
    );
}
