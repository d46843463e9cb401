use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static PAREN_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+?)\s*\(([^)]+)\)").unwrap());
static NAME_EDGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s+,]+|[\s+,]+$").unwrap());
static TOKEN_EDGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s+,]+|[\s+,.]+$").unwrap());
static LEADING_AND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*and\s+").unwrap());
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\+|\s*,\s*|\s+and\s+").unwrap());

/// A guest named in a pairing or arc listing, with its optional role note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestMention {
    pub name: String,
    pub descriptor: Option<String>,
}

impl GuestMention {
    fn new(name: &str, descriptor: Option<&str>) -> Self {
        GuestMention {
            name: name.to_string(),
            descriptor: descriptor.map(str::to_string),
        }
    }
}

impl fmt::Display for GuestMention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.descriptor {
            Some(d) => write!(f, "{} ({})", self.name, d),
            None => f.write_str(&self.name),
        }
    }
}

/// Ways of reading a guest listing, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `Name (descriptor)` groups, e.g. `Jane Doe (macro) + John Roe (VC)`.
    Parenthetical,
    /// Bare names split on `+`, commas and the word "and".
    Separators,
}

pub const STRATEGIES: [Strategy; 2] = [Strategy::Parenthetical, Strategy::Separators];

impl Strategy {
    pub fn apply(self, raw: &str, min_token_len: usize) -> Vec<GuestMention> {
        match self {
            Strategy::Parenthetical => parenthetical(raw),
            Strategy::Separators => separators(raw, min_token_len),
        }
    }
}

fn parenthetical(raw: &str) -> Vec<GuestMention> {
    PAREN_PAIR_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = clean(&NAME_EDGE_RE, &caps[1]);
            if name.is_empty() {
                return None;
            }
            let descriptor = Some(caps[2].trim()).filter(|d| !d.is_empty());
            Some(GuestMention::new(&name, descriptor))
        })
        .collect()
}

fn separators(raw: &str, min_token_len: usize) -> Vec<GuestMention> {
    SEPARATOR_RE
        .split(raw)
        .filter_map(|token| {
            let name = clean(&TOKEN_EDGE_RE, token);
            if name.is_empty() || name.chars().count() < min_token_len {
                if !name.is_empty() {
                    debug!(token = %name, "dropping short guest token");
                }
                return None;
            }
            Some(GuestMention::new(&name, None))
        })
        .collect()
}

fn clean(edges: &Regex, s: &str) -> String {
    let trimmed = edges.replace_all(s.trim(), "");
    LEADING_AND_RE.replace(&trimmed, "").into_owned()
}

/// Splits guest listings into names and descriptors.
#[derive(Debug, Clone, Copy)]
pub struct NameExtractor {
    min_token_len: usize,
}

impl Default for NameExtractor {
    fn default() -> Self {
        NameExtractor { min_token_len: 3 }
    }
}

impl NameExtractor {
    pub fn new(min_token_len: usize) -> Self {
        NameExtractor { min_token_len }
    }

    /// Result of the first strategy that yields anything; empty if none do.
    pub fn extract(&self, raw: &str) -> Vec<GuestMention> {
        STRATEGIES
            .iter()
            .map(|s| s.apply(raw, self.min_token_len))
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(found: &[GuestMention]) -> Vec<(&str, Option<&str>)> {
        found
            .iter()
            .map(|m| (m.name.as_str(), m.descriptor.as_deref()))
            .collect()
    }

    #[test]
    fn parenthetical_pairs() {
        let found = NameExtractor::default().extract("Jane Doe (macro strategist) + John Roe (VC)");
        assert_eq!(
            pairs(&found),
            vec![("Jane Doe", Some("macro strategist")), ("John Roe", Some("VC"))]
        );
    }

    #[test]
    fn parenthetical_strips_and_connector() {
        let found = NameExtractor::default().extract("Jane Doe (bull), and John Roe (bear)");
        assert_eq!(pairs(&found), vec![("Jane Doe", Some("bull")), ("John Roe", Some("bear"))]);
    }

    #[test]
    fn blank_descriptor_is_absent() {
        let found = NameExtractor::default().extract("Jane Doe ( ) + John Roe (VC)");
        assert_eq!(pairs(&found), vec![("Jane Doe", None), ("John Roe", Some("VC"))]);
        assert_eq!(found[0].to_string(), "Jane Doe");
    }

    #[test]
    fn fallback_without_parentheses() {
        let found = NameExtractor::default().extract("Jane Doe and John Roe");
        assert_eq!(pairs(&found), vec![("Jane Doe", None), ("John Roe", None)]);
    }

    #[test]
    fn fallback_mixed_separators() {
        let found = NameExtractor::default().extract("Jane Doe + John Roe, Ann Lee AND Bo Li.");
        assert_eq!(
            pairs(&found),
            vec![("Jane Doe", None), ("John Roe", None), ("Ann Lee", None), ("Bo Li", None)]
        );
    }

    #[test]
    fn fallback_threshold_is_configurable() {
        let raw = "Jane Doe + Al";
        assert_eq!(NameExtractor::new(3).extract(raw).len(), 1);
        assert_eq!(NameExtractor::new(2).extract(raw).len(), 2);
    }

    #[test]
    fn strategies_independently() {
        let raw = "Jane Doe and John Roe";
        assert!(Strategy::Parenthetical.apply(raw, 3).is_empty());
        assert_eq!(Strategy::Separators.apply(raw, 3).len(), 2);
    }

    #[test]
    fn empty_and_punctuation_only() {
        assert!(NameExtractor::default().extract("").is_empty());
        assert!(NameExtractor::default().extract(" + , + ").is_empty());
    }

    #[test]
    fn display_with_descriptor() {
        let found = NameExtractor::default().extract("Jane Doe (skeptic) + John Roe");
        assert_eq!(found[0].to_string(), "Jane Doe (skeptic)");
    }
}
