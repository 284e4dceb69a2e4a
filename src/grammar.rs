//! Rule grammars recognised in blacklist sources.
//!
//! Each grammar is a regular expression with a single capture group holding
//! the candidate domain. Lines are expected to be lowercased and trimmed
//! before they reach a grammar.
//!
//! | Grammar            | Trust     | Example                              |
//! |--------------------|-----------|--------------------------------------|
//! | `ublock_rule`      | untrusted | `\|\|ads.example.com^$third-party`   |
//! | `plain_domain`     | untrusted | `ads.example.com`                    |
//! | `hosts_entry`      | untrusted | `0.0.0.0 ads.example.com`            |
//! | `mdl_csv`          | untrusted | `"2019/01/01","ads.example.com",...` |
//! | `generic_csv`      | untrusted | `ads.example.com,x,2019-01-01 10:00,`|
//! | `trusted_literal`  | trusted   | `*.ads.example.com`                  |

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::source::TrustLevel;

/// Domain token: labels of `[a-z0-9.-]`, then a dot and a final label of
/// at least two letters.
const DOMAIN: &str = r"[a-z0-9.-]+[.][a-z]{2,}";

const COMMENT_OR_BLANK: &str = r"^(#|$)";
const TRUSTED_LITERAL: &str = r"^([*a-z0-9.-]+)$";

static STANDARD: Lazy<GrammarTable> =
    Lazy::new(|| GrammarTable::new().expect("built-in grammar patterns are valid"));

/// Grammar identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarName {
    CommentOrBlank,
    UblockRule,
    PlainDomain,
    HostsEntry,
    MdlCsv,
    GenericCsv,
    TrustedLiteral,
}

impl GrammarName {
    pub fn as_str(self) -> &'static str {
        match self {
            GrammarName::CommentOrBlank => "comment_or_blank",
            GrammarName::UblockRule => "ublock_rule",
            GrammarName::PlainDomain => "plain_domain",
            GrammarName::HostsEntry => "hosts_entry",
            GrammarName::MdlCsv => "mdl_csv",
            GrammarName::GenericCsv => "generic_csv",
            GrammarName::TrustedLiteral => "trusted_literal",
        }
    }
}

impl fmt::Display for GrammarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named pattern with exactly one capture group.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: GrammarName,
    pattern: Regex,
}

impl Grammar {
    fn new(name: GrammarName, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn name(&self) -> GrammarName {
        self.name
    }

    /// Return the captured domain token if the line matches.
    pub fn capture<'h>(&self, line: &'h str) -> Option<&'h str> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Ordered grammars split by trust level.
#[derive(Debug, Clone)]
pub struct GrammarTable {
    comment: Regex,
    untrusted: Vec<Grammar>,
    trusted: Vec<Grammar>,
}

impl GrammarTable {
    /// Compile the built-in grammars.
    ///
    /// Prefer [`GrammarTable::standard`], which compiles them once per process.
    pub fn new() -> Result<Self, regex::Error> {
        let untrusted = vec![
            Grammar::new(
                GrammarName::UblockRule,
                &format!(r"^@*\|\|({DOMAIN})\^?(\$(popup|third-party))?$"),
            )?,
            Grammar::new(GrammarName::PlainDomain, &format!(r"^({DOMAIN})$"))?,
            Grammar::new(
                GrammarName::HostsEntry,
                &format!(
                    r"^[0-9]{{1,3}}[.][0-9]{{1,3}}[.][0-9]{{1,3}}[.][0-9]{{1,3}}\s+({DOMAIN})$"
                ),
            )?,
            Grammar::new(GrammarName::MdlCsv, &format!(r#"^"[^"]+","({DOMAIN})","#))?,
            Grammar::new(
                GrammarName::GenericCsv,
                &format!(r"^({DOMAIN}),.+,[0-9: /-]+,"),
            )?,
        ];
        let trusted = vec![Grammar::new(GrammarName::TrustedLiteral, TRUSTED_LITERAL)?];

        Ok(Self {
            comment: Regex::new(COMMENT_OR_BLANK)?,
            untrusted,
            trusted,
        })
    }

    /// Process-wide compiled table.
    pub fn standard() -> &'static GrammarTable {
        &STANDARD
    }

    /// Grammars applicable to a source of the given trust, in evaluation order.
    pub fn for_trust(&self, trust: TrustLevel) -> &[Grammar] {
        match trust {
            TrustLevel::Trusted => &self.trusted,
            TrustLevel::Untrusted => &self.untrusted,
        }
    }

    /// Comment (`#...`) or empty line. Such lines never reach other grammars.
    pub fn is_comment_or_blank(&self, line: &str) -> bool {
        self.comment.is_match(line)
    }
}
