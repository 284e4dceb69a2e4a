//! Line classification against the rule grammars.

use std::collections::HashSet;

use crate::grammar::{GrammarName, GrammarTable};
use crate::source::TrustLevel;

/// A domain name captured by one grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarMatch {
    pub grammar: GrammarName,
    pub name: String,
}

/// Lowercase and trim a raw line.
pub fn normalize(line: &str) -> String {
    line.to_lowercase().trim().to_string()
}

/// Classify one line and report which grammar produced each name.
///
/// Every grammar applicable to `trust` is tried; evaluation does not stop at
/// the first match. A name already produced for this line by an earlier
/// grammar is not repeated.
pub fn classify_line_matches(line: &str, trust: TrustLevel) -> Vec<GrammarMatch> {
    let table = GrammarTable::standard();
    let normalized = normalize(line);

    if table.is_comment_or_blank(&normalized) {
        return Vec::new();
    }

    let mut matches: Vec<GrammarMatch> = Vec::new();
    for grammar in table.for_trust(trust) {
        let Some(name) = grammar.capture(&normalized) else {
            continue;
        };
        if matches.iter().any(|m| m.name == name) {
            continue;
        }
        matches.push(GrammarMatch {
            grammar: grammar.name(),
            name: name.to_string(),
        });
    }
    matches
}

/// Classify one line, returning the distinct domain names it yields.
///
/// # Examples
/// ```
/// use domain_blacklist::classifier::classify_line;
/// use domain_blacklist::source::TrustLevel;
/// assert_eq!(classify_line("0.0.0.0 Ads.Example.com", TrustLevel::Untrusted), vec!["ads.example.com"]);
/// assert!(classify_line("# comment", TrustLevel::Untrusted).is_empty());
/// ```
pub fn classify_line(line: &str, trust: TrustLevel) -> Vec<String> {
    classify_line_matches(line, trust)
        .into_iter()
        .map(|m| m.name)
        .collect()
}

/// Classify all lines of one source into a private, duplicate-free list.
///
/// Names keep the order in which they were first seen.
pub fn classify_lines<'a, I>(lines: I, trust: TrustLevel) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for line in lines {
        for name in classify_line(line, trust) {
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
    }
    names
}

/// Split raw content on `\r` and `\n`, dropping empty segments.
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content.split(['\r', '\n']).filter(|line| !line.is_empty())
}
