//! US state abbreviation lookup and expansion.
//!
//! The table holds the 50 states plus the District of Columbia. Lookups are
//! case-insensitive in both directions.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Two-letter postal codes and the full names they expand to.
pub const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AR", "Arkansas"),
    ("AZ", "Arizona"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

static STATE_NAMES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| STATE_ABBREVIATIONS.iter().copied().collect());

/// Any known code as a standalone word. One alternation so a single pass
/// never revisits text it has already replaced.
static STATE_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let codes: Vec<&str> = STATE_ABBREVIATIONS.iter().map(|(code, _)| *code).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", codes.join("|"))).expect("Invalid state code regex")
});

/// Full name for a two-letter code (case-insensitive).
///
/// # Examples
///
/// ```
/// use sheetops_normalization::state_name;
///
/// assert_eq!(state_name("tx"), Some("Texas"));
/// assert_eq!(state_name("XX"), None);
/// ```
pub fn state_name(code: &str) -> Option<&'static str> {
    STATE_NAMES
        .get(code.trim().to_ascii_uppercase().as_str())
        .copied()
}

/// Two-letter code for a full state name (case-insensitive).
pub fn state_code(name: &str) -> Option<&'static str> {
    let name = name.trim();
    STATE_ABBREVIATIONS
        .iter()
        .find(|(_, full)| full.eq_ignore_ascii_case(name))
        .map(|(code, _)| *code)
}

/// Replace every standalone state code in `text` with the state's full name.
///
/// Matching is case-insensitive and respects word boundaries, so letter pairs
/// inside longer words are left alone. Text without codes is borrowed back
/// unchanged.
///
/// # Examples
///
/// ```
/// use sheetops_normalization::expand_state_abbreviations;
///
/// assert_eq!(expand_state_abbreviations("of CA"), "of California");
/// assert_eq!(expand_state_abbreviations("North Dakota"), "North Dakota");
/// assert_eq!(expand_state_abbreviations("Calvary"), "Calvary");
/// ```
pub fn expand_state_abbreviations(text: &str) -> Cow<'_, str> {
    if text.is_empty() {
        return Cow::Borrowed(text);
    }
    STATE_CODE_REGEX.replace_all(text, |caps: &Captures<'_>| {
        let code = &caps[0];
        state_name(code).unwrap_or(code).to_string()
    })
}
