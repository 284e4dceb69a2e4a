//! Error types for domain-blacklist.

use thiserror::Error;

/// Reasons a single rule source failed to load.
///
/// These never abort an aggregation run; they are recorded on the
/// per-source report and the source contributes no names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlacklistError {
    #[error("File system error: {0}")]
    Io(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("Response too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: usize },
}
