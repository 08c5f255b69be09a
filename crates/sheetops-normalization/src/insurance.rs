//! Insurance payer-name canonicalization.
//!
//! Raw payer labels from scheduling exports look like
//! `"Delta Dental of CA Ph#800-555-1234 (Primary)"`. [`canonicalize`] reduces
//! them to a short canonical name (`"DD California"`) in a fixed sequence:
//!
//! 1. sentinel status values short-circuit (`NO INSURANCE`, `DUPLICATE`, ...)
//! 2. everything from the `Ph#` marker on is dropped
//! 3. `Primary` / `Secondary` qualifiers are removed
//! 4. the ordered rule table in [`crate::rules`] is consulted, first match wins
//! 5. unmatched text passes through cleaned

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::rules::{COMPILED_RULES, PAYER_RULES, RuleStrategy};
use crate::state::expand_state_abbreviations;

/// Marker that starts the phone-number suffix of a payer label.
pub const PHONE_MARKER: &str = "Ph#";

/// Status values that are not payers, keyed by their uppercase form.
pub const SENTINELS: &[(&str, &str)] = &[
    ("NO INSURANCE", "No Insurance"),
    ("PATIENT NOT FOUND", "PATIENT NOT FOUND"),
    ("DUPLICATE", "DUPLICATE"),
];

/// Applied in order; parenthesized forms go first so no stray parentheses remain.
static QUALIFIER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s*\(Primary\)",
        r"(?i)\s*\(Secondary\)",
        r"(?i)\s*Primary",
        r"(?i)\s*Secondary",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid qualifier regex"))
    .collect()
});

/// Coarse kind of a canonicalization result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchCategory {
    Sentinel,
    Family,
    Fixed,
    Passthrough,
}

impl MatchCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sentinel => "sentinel",
            Self::Family => "family",
            Self::Fixed => "fixed",
            Self::Passthrough => "passthrough",
        }
    }
}

/// Typed result of classifying a payer label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayerMatch {
    /// A non-payer status value.
    Sentinel(&'static str),
    /// A regional plan family, e.g. `DD` + `California`.
    Family {
        tag: &'static str,
        region: Option<String>,
    },
    /// A fixed canonical payer name.
    Fixed(&'static str),
    /// No rule matched; the cleaned input.
    Passthrough(String),
}

impl PayerMatch {
    pub fn category(&self) -> MatchCategory {
        match self {
            Self::Sentinel(_) => MatchCategory::Sentinel,
            Self::Family { .. } => MatchCategory::Family,
            Self::Fixed(_) => MatchCategory::Fixed,
            Self::Passthrough(_) => MatchCategory::Passthrough,
        }
    }

    /// The canonical display string.
    pub fn into_canonical(self) -> String {
        match self {
            Self::Sentinel(name) | Self::Fixed(name) => name.to_string(),
            Self::Family { tag, region: None } => tag.to_string(),
            Self::Family {
                tag,
                region: Some(region),
            } => format!("{tag} {region}"),
            Self::Passthrough(text) => text,
        }
    }
}

impl fmt::Display for PayerMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentinel(name) | Self::Fixed(name) => f.write_str(name),
            Self::Family { tag, region: None } => f.write_str(tag),
            Self::Family {
                tag,
                region: Some(region),
            } => write!(f, "{tag} {region}"),
            Self::Passthrough(text) => f.write_str(text),
        }
    }
}

fn match_sentinel(trimmed: &str) -> Option<&'static str> {
    let upper = trimmed.to_uppercase();
    SENTINELS
        .iter()
        .find(|(key, _)| *key == upper)
        .map(|(_, output)| *output)
}

/// Cut the label at the phone marker, if present.
fn strip_phone_suffix(text: &str) -> &str {
    match text.split_once(PHONE_MARKER) {
        Some((company, _)) => company.trim(),
        None => text,
    }
}

fn strip_qualifiers(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in QUALIFIER_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned
}

fn apply_rules(company: &str) -> Option<PayerMatch> {
    let compiled = COMPILED_RULES
        .iter()
        .find(|compiled| compiled.detect.is_match(company))?;
    let payer = match compiled.rule.strategy {
        RuleStrategy::Canonical(output) => PayerMatch::Fixed(output),
        RuleStrategy::RegionFamily { tag, .. } => {
            let region = compiled
                .extract
                .as_ref()
                .and_then(|extract| extract.captures(company))
                .and_then(|caps| caps.get(1))
                .map(|group| group.as_str().trim())
                .filter(|region| !region.is_empty())
                .map(|region| expand_state_abbreviations(region).into_owned());
            PayerMatch::Family { tag, region }
        }
    };
    Some(payer)
}

/// Classify a payer label without rendering it.
///
/// Empty input classifies as an empty passthrough.
pub fn classify(raw: &str) -> PayerMatch {
    let trimmed = raw.trim();
    if let Some(sentinel) = match_sentinel(trimmed) {
        return PayerMatch::Sentinel(sentinel);
    }
    let company = strip_qualifiers(strip_phone_suffix(trimmed));
    apply_rules(&company).unwrap_or_else(|| PayerMatch::Passthrough(company.trim().to_string()))
}

/// Canonical name for a raw payer label.
///
/// Total and deterministic: empty input is returned as-is and unmatched text
/// comes back trimmed with qualifiers removed.
///
/// # Examples
///
/// ```
/// use sheetops_normalization::canonicalize;
///
/// assert_eq!(canonicalize("Delta Dental of CA Ph#800-555-1234"), "DD California");
/// assert_eq!(canonicalize("BCBS TX (Primary)"), "BCBS Texas");
/// assert_eq!(canonicalize("no insurance"), "No Insurance");
/// assert_eq!(canonicalize("Some Random Payer Co"), "Some Random Payer Co");
/// ```
pub fn canonicalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    classify(raw).into_canonical()
}

/// [`canonicalize`] for nullable cells; `None` stays `None`.
pub fn canonicalize_opt(raw: Option<&str>) -> Option<String> {
    raw.map(canonicalize)
}

/// Every canonical name the rules can produce, excluding regional suffixes
/// and passthrough text. Sentinels first, then rule outputs in table order.
pub fn canonical_vocabulary() -> Vec<&'static str> {
    SENTINELS
        .iter()
        .map(|(_, output)| *output)
        .chain(PAYER_RULES.iter().map(crate::rules::PayerRule::base_output))
        .collect()
}
