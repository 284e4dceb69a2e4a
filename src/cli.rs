//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "domain-blacklist")]
#[command(author, version, about = "Domain blacklist builder for DNS filtering proxies")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(
        short,
        long,
        default_value = "/etc/domain-blacklist/config.yaml",
        global = true
    )]
    pub config: PathBuf,

    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all sources, merge them and write the blacklist rule file
    Build {
        /// Output file (overrides the configured path)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Dry-run mode: aggregate and report but don't write the rule file
        #[arg(long)]
        dry_run: bool,
    },

    /// Show which names a local file yields and which grammar matched
    Classify {
        /// File to classify
        file: PathBuf,

        /// Parse with the untrusted (ad-block/hosts/CSV) grammars
        #[arg(long)]
        untrusted: bool,
    },

    /// List configured rule sources
    Sources,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}
