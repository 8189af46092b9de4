//! Exclusion rules: deterministic description matching that moves noise rows
//! (card payments, fuel, liquor) out of the exported ledger.

use serde::Serialize;

/// Phrases matched anywhere in the lower-cased description
pub const DEFAULT_EXCLUDED_PHRASES: &[&str] = &[
    "payment thank you - web",
    "payment thank you-mobile",
    "bp fuel",
    "kroger fuel",
    "total wine",
];

/// Prefixes matched only at the start of the lower-cased description
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["bp#"];

/// Case-insensitive exclusion rules. Rule strings are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionRuleSet {
    phrases: Vec<String>,
    prefixes: Vec<String>,
}

impl ExclusionRuleSet {
    pub fn new<P, Q>(phrases: P, prefixes: Q) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        Q: IntoIterator,
        Q::Item: AsRef<str>,
    {
        Self {
            phrases: lower_unique(phrases),
            prefixes: lower_unique(prefixes),
        }
    }

    /// Rule set that excludes nothing
    pub fn empty() -> Self {
        Self {
            phrases: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty() && self.prefixes.is_empty()
    }

    /// True when the description contains a phrase or starts with a prefix.
    pub fn excludes(&self, description: &str) -> bool {
        let desc = description.to_lowercase();
        self.matches_phrase(&desc) || self.matches_prefix(&desc)
    }

    fn matches_phrase(&self, desc_lower: &str) -> bool {
        self.phrases.iter().any(|p| desc_lower.contains(p.as_str()))
    }

    fn matches_prefix(&self, desc_lower: &str) -> bool {
        self.prefixes.iter().any(|p| desc_lower.starts_with(p.as_str()))
    }
}

impl Default for ExclusionRuleSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_PHRASES, DEFAULT_EXCLUDED_PREFIXES)
    }
}

fn lower_unique<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let s = item.as_ref().to_lowercase();
        if !out.contains(&s) {
            out.push(s);
        }
    }
    out
}
