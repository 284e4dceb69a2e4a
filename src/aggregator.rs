//! Rule aggregation and whitelist subtraction.
//!
//! Each source is classified into its own name list first; the lists are
//! then folded into one sorted set in a single merge step, and whitelist
//! entries are removed by exact string equality.

use anyhow::Result;
use std::collections::{BTreeSet, HashSet};
use tracing::info;

use crate::classifier::{classify_lines, normalize, split_lines};
use crate::fetcher::{FetchResult, Fetcher, SourceStatus};
use crate::source::{RuleSource, TrustLevel};
use crate::utils::format_count;

/// Per-source diagnostic
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: RuleSource,
    pub status: SourceStatus,
    /// Non-empty lines read from the source
    pub line_count: usize,
    /// Distinct names extracted from the source
    pub name_count: usize,
}

/// Result of one aggregation run
#[derive(Debug, Clone, Default)]
pub struct AggregationReport {
    /// Final rule set, sorted and duplicate-free
    pub rules: Vec<String>,
    /// One entry per input source, in input order
    pub sources: Vec<SourceReport>,
    /// Size of the merged set before whitelist subtraction
    pub merged_count: usize,
}

impl AggregationReport {
    /// Number of merged names removed by the whitelist
    pub fn whitelisted_count(&self) -> usize {
        self.merged_count.saturating_sub(self.rules.len())
    }

    /// Number of sources that failed to load
    pub fn failed_count(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| matches!(s.status, SourceStatus::Failed(_)))
            .count()
    }
}

/// Runs fetch, classification, merge and whitelist subtraction
pub struct Aggregator {
    fetcher: Fetcher,
}

impl Aggregator {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Aggregate all sources and subtract the whitelist, with per-source report.
    pub async fn run(&self, sources: &[RuleSource], whitelist: &[String]) -> AggregationReport {
        let fetched = self.fetcher.fetch_sources(sources).await;

        let mut reports = Vec::with_capacity(fetched.len());
        let mut per_source = Vec::with_capacity(fetched.len());
        for result in fetched {
            let (report, names) = classify_fetched(result);
            reports.push(report);
            per_source.push(names);
        }

        let merged = merge(per_source);
        let merged_count = merged.len();
        let rules: Vec<String> = subtract_whitelist(merged, whitelist).into_iter().collect();

        info!(
            "Aggregated {} names from {} sources, {} after whitelist",
            format_count(merged_count),
            reports.len(),
            format_count(rules.len())
        );

        AggregationReport {
            rules,
            sources: reports,
            merged_count,
        }
    }
}

/// Aggregate `sources`, remove `whitelist` entries and return the sorted rule set.
///
/// Unavailable sources contribute nothing. The only error is failing to
/// construct the HTTP client.
pub async fn aggregate(sources: &[RuleSource], whitelist: &[String]) -> Result<Vec<String>> {
    Ok(aggregate_with_report(sources, whitelist).await?.rules)
}

/// Same as [`aggregate`], keeping the per-source diagnostics.
pub async fn aggregate_with_report(
    sources: &[RuleSource],
    whitelist: &[String],
) -> Result<AggregationReport> {
    let aggregator = Aggregator::new(Fetcher::new()?);
    Ok(aggregator.run(sources, whitelist).await)
}

fn classify_fetched(result: FetchResult) -> (SourceReport, Vec<String>) {
    let trust = result.source.trust();
    let line_count = split_lines(&result.content).count();
    let names = classify_lines(split_lines(&result.content), trust);

    if result.status.is_loaded() {
        info!(
            "{}: {} lines, {} names ({})",
            result.source,
            line_count,
            names.len(),
            trust
        );
    }

    let report = SourceReport {
        source: result.source,
        status: result.status,
        line_count,
        name_count: names.len(),
    };
    (report, names)
}

/// Fold per-source name lists into one sorted, duplicate-free set.
pub fn merge<I>(per_source: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    per_source.into_iter().flatten().collect()
}

/// Remove every element exactly equal to a whitelist entry.
///
/// No case folding, suffix or wildcard matching: `example.com` does not
/// remove `sub.example.com`, and `*.example.com` is only removed by the
/// literal `*.example.com`.
pub fn subtract_whitelist(mut set: BTreeSet<String>, whitelist: &[String]) -> BTreeSet<String> {
    let whitelist: HashSet<&str> = whitelist.iter().map(String::as_str).collect();
    set.retain(|name| !whitelist.contains(name.as_str()));
    set
}

/// Build a rule set from already loaded content, without any I/O.
pub fn build_rule_set(inputs: &[(TrustLevel, &str)], whitelist: &[String]) -> Vec<String> {
    let per_source = inputs
        .iter()
        .map(|(trust, content)| classify_lines(split_lines(content), *trust));
    subtract_whitelist(merge(per_source), whitelist)
        .into_iter()
        .collect()
}

/// Parse whitelist file content: one entry per line, `#` comments, normalized.
pub fn parse_whitelist(content: &str) -> Vec<String> {
    split_lines(content)
        .map(normalize)
        .filter(|entry| !entry.is_empty() && !entry.starts_with('#'))
        .collect()
}
