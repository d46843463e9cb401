use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

/// How guest names are compared when table rows, detail blocks and episode
/// listings are joined together.
///
/// The two import scripts this tool replaces disagreed here: one matched
/// names exactly, the other lowercased and dropped punctuation first.
/// Which one is canonical is still open, so both are selectable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMatching {
    #[default]
    Exact,
    Normalized,
}

impl NameMatching {
    /// Lookup key for `name` under this policy.
    pub fn key(self, name: &str) -> String {
        match self {
            NameMatching::Exact => name.to_string(),
            NameMatching::Normalized => normalize_name(name),
        }
    }

    pub fn same(self, a: &str, b: &str) -> bool {
        match self {
            NameMatching::Exact => a == b,
            NameMatching::Normalized => normalize_name(a) == normalize_name(b),
        }
    }
}

/// Lowercase, drop punctuation, collapse runs of whitespace.
pub fn normalize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn default_min_fallback_token_len() -> usize {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub name_matching: NameMatching,
    /// Fallback name tokens shorter than this (in chars) are discarded.
    #[serde(default = "default_min_fallback_token_len")]
    pub min_fallback_token_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            name_matching: NameMatching::default(),
            min_fallback_token_len: default_min_fallback_token_len(),
        }
    }
}

const ENV_PREFIX: &str = "RESEARCH";

impl Settings {
    /// Defaults, then the optional file, then `RESEARCH_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(file, ENV_PREFIX)
    }

    fn load_with_env(file: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
