//! Rule source descriptors.
//!
//! A source is either a local file written by the operator or a remote
//! community list. The trust level decides which grammars parse its lines;
//! it defaults from the kind but can be overridden per source.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Prefix marking a descriptor string as a local file.
pub const FILE_PREFIX: &str = "file:";

/// Where a source's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Local file, locator is a path
    File,
    /// Remote list, locator is an opaque endpoint string
    Remote,
}

impl SourceKind {
    /// Trust level a source of this kind gets unless overridden.
    pub fn default_trust(self) -> TrustLevel {
        match self {
            SourceKind::File => TrustLevel::Trusted,
            SourceKind::Remote => TrustLevel::Untrusted,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => f.write_str("file"),
            SourceKind::Remote => f.write_str("remote"),
        }
    }
}

/// How much the content of a source is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    /// Lenient single-token grammar, wildcards allowed
    Trusted,
    /// Ad-block, hosts and CSV grammars
    Untrusted,
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustLevel::Trusted => f.write_str("trusted"),
            TrustLevel::Untrusted => f.write_str("untrusted"),
        }
    }
}

/// One origin of domain-blocking entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSource {
    kind: SourceKind,
    locator: String,
    trust: TrustLevel,
}

impl RuleSource {
    /// Local file source (trusted by default).
    pub fn file(path: impl Into<String>) -> Self {
        Self::new(SourceKind::File, path)
    }

    /// Remote source (untrusted by default).
    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self::new(SourceKind::Remote, endpoint)
    }

    fn new(kind: SourceKind, locator: impl Into<String>) -> Self {
        Self {
            kind,
            locator: locator.into(),
            trust: kind.default_trust(),
        }
    }

    /// Parse a descriptor string: `file:<path>` or a bare remote endpoint.
    ///
    /// # Examples
    /// ```
    /// use domain_blacklist::source::{RuleSource, SourceKind};
    /// assert_eq!(RuleSource::parse("file:/etc/rules.txt").kind(), SourceKind::File);
    /// assert_eq!(RuleSource::parse("https://example.org/list").kind(), SourceKind::Remote);
    /// ```
    pub fn parse(descriptor: &str) -> Self {
        match descriptor.strip_prefix(FILE_PREFIX) {
            Some(path) => Self::file(path),
            None => Self::remote(descriptor),
        }
    }

    /// Override the trust level derived from the kind.
    pub fn with_trust(mut self, trust: TrustLevel) -> Self {
        self.trust = trust;
        self
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn trust(&self) -> TrustLevel {
        self.trust
    }

    /// Filesystem path for file sources.
    pub fn path(&self) -> Option<&Path> {
        match self.kind {
            SourceKind::File => Some(Path::new(&self.locator)),
            SourceKind::Remote => None,
        }
    }

    /// Descriptor string form, inverse of [`RuleSource::parse`].
    pub fn descriptor(&self) -> String {
        match self.kind {
            SourceKind::File => format!("{}{}", FILE_PREFIX, self.locator),
            SourceKind::Remote => self.locator.clone(),
        }
    }
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}

impl From<&str> for RuleSource {
    fn from(descriptor: &str) -> Self {
        Self::parse(descriptor)
    }
}
