//! Classify command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::classifier::{classify_line_matches, split_lines};
use crate::fetcher::read_local_file;
use crate::fs_abstraction::real_fs;
use crate::source::TrustLevel;

/// Run the classify command
pub async fn run(file: &Path, untrusted: bool) -> Result<()> {
    let content = read_local_file(file, real_fs())
        .with_context(|| format!("Failed to read {:?}", file))?
        .with_context(|| format!("{:?} is not a readable file", file))?;

    let trust = if untrusted {
        TrustLevel::Untrusted
    } else {
        TrustLevel::Trusted
    };

    let mut total = 0usize;
    for (index, line) in split_lines(&content).enumerate() {
        for m in classify_line_matches(line, trust) {
            println!("{}\t{}\t{}", index + 1, m.grammar, m.name);
            total += 1;
        }
    }

    println!();
    println!("{} names extracted ({} grammar)", total, trust);

    Ok(())
}
