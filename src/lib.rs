//! # domain-blacklist - Domain blacklist builder
//!
//! Builds the domain blacklist consumed by a DNS filtering proxy from any
//! number of rule sources: operator-maintained local files and community
//! lists in ad-block, hosts and CSV formats.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     domain-blacklist                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: build, classify, sources, init             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Sources, whitelist, output path, fetch policy        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls)                                 │
//! │    ├── Local files (trusted)                                │
//! │    └── Remote lists (untrusted, single attempt)             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Grammar table + classifier (regex)                         │
//! │    └── ublock, plain, hosts, CSV, trusted literal           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Aggregator                                                 │
//! │    └── Per-source lists, single merge, whitelist subtraction│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use domain_blacklist::aggregator::aggregate;
//! use domain_blacklist::source::RuleSource;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let sources = vec![
//!         RuleSource::parse("file:/etc/domain-blacklist/domain-blacklist.txt"),
//!         RuleSource::parse("https://example.org/hosts.txt"),
//!     ];
//!     let whitelist = vec!["example.com".to_string()];
//!
//!     for name in aggregate(&sources, &whitelist).await? {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`] - Merge and whitelist subtraction
//! - [`classifier`] - Line normalization and classification
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Per-source failure reasons
//! - [`fetcher`] - Local file and HTTP source loading
//! - [`fs_abstraction`] - Filesystem trait for testability
//! - [`grammar`] - Rule grammars
//! - [`source`] - Rule source descriptors and trust levels
//! - [`utils`] - Formatting helpers
//! - [`writer`] - Atomic rule file output

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod fs_abstraction;
pub mod grammar;
pub mod source;
pub mod utils;
pub mod writer;

pub use aggregator::{aggregate, aggregate_with_report, AggregationReport, Aggregator};
pub use config::Config;
pub use error::BlacklistError;
pub use source::{RuleSource, SourceKind, TrustLevel};
