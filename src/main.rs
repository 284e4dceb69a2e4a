//! domain-blacklist - Domain blacklist builder for DNS filtering proxies
//!
//! Merges local and remote rule lists into one deduplicated rule file.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use domain_blacklist::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Build { output, dry_run } => {
            domain_blacklist::commands::build::run(output, dry_run, &cli.config).await
        }
        Commands::Classify { file, untrusted } => {
            domain_blacklist::commands::classify::run(&file, untrusted).await
        }
        Commands::Sources => domain_blacklist::commands::sources::run(&cli.config).await,
        Commands::Init { force } => domain_blacklist::commands::init::run(force, &cli.config).await,
        Commands::Version => {
            println!("domain-blacklist {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
