//! Configuration management for domain-blacklist.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::aggregator::parse_whitelist;
use crate::classifier::normalize;
use crate::fetcher::read_local_file;
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::source::{RuleSource, SourceKind, TrustLevel, FILE_PREFIX};

/// Directory holding the default rule, whitelist and output files
pub const DEFAULT_DIR: &str = "/etc/domain-blacklist";

/// Upper bound for the per-request timeout
const MAX_TIMEOUT_SECS: u64 = 300;

/// Upper bound for concurrent source fetches
const MAX_CONCURRENT_LIMIT: usize = 64;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Ordered rule sources
    pub sources: Vec<SourceEntry>,

    /// Literal whitelist entries
    pub whitelist: Vec<String>,

    /// Whitelist files (one entry per line, `#` comments)
    pub whitelist_files: Vec<PathBuf>,

    /// Rule file written by `build`
    pub output: PathBuf,

    /// Remote fetch policy
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: vec![SourceEntry::Descriptor(format!(
                "{}{}/domain-blacklist.txt",
                FILE_PREFIX, DEFAULT_DIR
            ))],
            whitelist: Vec::new(),
            whitelist_files: vec![PathBuf::from(format!("{}/domain-whitelist.txt", DEFAULT_DIR))],
            output: PathBuf::from(format!("{}/blacklist.txt", DEFAULT_DIR)),
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (index, entry) in self.sources.iter().enumerate() {
            if entry.locator().trim().is_empty() {
                anyhow::bail!("Source #{} has an empty locator", index + 1);
            }
        }

        if self.output.as_os_str().is_empty() {
            anyhow::bail!("Output path must not be empty");
        }

        self.fetch.validate()?;

        Ok(())
    }

    /// Effective whitelist: literal entries plus the content of whitelist files
    pub fn load_whitelist(&self) -> Vec<String> {
        self.load_whitelist_with_fs(real_fs())
    }

    /// Effective whitelist using an injected FileSystem
    ///
    /// Missing or unreadable whitelist files contribute nothing.
    pub fn load_whitelist_with_fs<F: FileSystem + ?Sized>(&self, fs: &F) -> Vec<String> {
        let mut entries: Vec<String> = self
            .whitelist
            .iter()
            .map(|entry| normalize(entry))
            .filter(|entry| !entry.is_empty() && !entry.starts_with('#'))
            .collect();

        for path in &self.whitelist_files {
            match read_local_file(path, fs) {
                Ok(Some(content)) => {
                    let parsed = parse_whitelist(&content);
                    debug!("Whitelist file {:?}: {} entries", path, parsed.len());
                    entries.extend(parsed);
                }
                Ok(None) => debug!("Whitelist file {:?} not found, skipping", path),
                Err(e) => warn!("Failed to read whitelist file {:?}: {}", path, e),
            }
        }

        entries
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

/// One configured rule source.
///
/// Either a descriptor string (`file:<path>` or a remote endpoint) or a
/// mapping that can set the kind and override the trust level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Descriptor(String),
    Detailed {
        locator: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<SourceKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trust: Option<TrustLevel>,
    },
}

impl SourceEntry {
    pub fn locator(&self) -> &str {
        match self {
            SourceEntry::Descriptor(descriptor) => descriptor,
            SourceEntry::Detailed { locator, .. } => locator,
        }
    }

    pub fn to_rule_source(&self) -> RuleSource {
        match self {
            SourceEntry::Descriptor(descriptor) => RuleSource::parse(descriptor),
            SourceEntry::Detailed {
                locator,
                kind,
                trust,
            } => {
                let source = match kind {
                    Some(SourceKind::File) => {
                        RuleSource::file(locator.strip_prefix(FILE_PREFIX).unwrap_or(locator))
                    }
                    Some(SourceKind::Remote) => RuleSource::remote(locator.as_str()),
                    None => RuleSource::parse(locator),
                };
                match trust {
                    Some(trust) => source.with_trust(*trust),
                    None => source,
                }
            }
        }
    }
}

/// Remote fetch policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum number of sources fetched at the same time
    pub max_concurrent: usize,

    /// Maximum accepted body size per remote source
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_concurrent: 6,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl FetchConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.timeout_secs) {
            anyhow::bail!(
                "Invalid fetch.timeout_secs {}. Must be between 1 and {}",
                self.timeout_secs,
                MAX_TIMEOUT_SECS
            );
        }
        if !(1..=MAX_CONCURRENT_LIMIT).contains(&self.max_concurrent) {
            anyhow::bail!(
                "Invalid fetch.max_concurrent {}. Must be between 1 and {}",
                self.max_concurrent,
                MAX_CONCURRENT_LIMIT
            );
        }
        if self.max_body_bytes == 0 {
            anyhow::bail!("Invalid fetch.max_body_bytes: must be greater than 0");
        }
        Ok(())
    }
}
