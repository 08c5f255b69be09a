//! Payer-name normalization.
//!
//! Maps free-text insurance payer labels onto a fixed vocabulary of canonical
//! names. All tables are immutable process-wide statics, so every function
//! here is pure and safe to call from any thread.
//!
//! - **state**: two-letter US state code lookup and word-boundary expansion
//! - **rules**: the ordered payer rule table (first match wins)
//! - **insurance**: the canonicalization pipeline built on both

pub mod insurance;
pub mod rules;
pub mod state;

pub use insurance::{
    MatchCategory, PHONE_MARKER, PayerMatch, SENTINELS, canonical_vocabulary, canonicalize,
    canonicalize_opt, classify,
};
pub use rules::{BCBS_TAG, DELTA_DENTAL_TAG, PayerRule, RuleStrategy, payer_rules};
pub use state::{STATE_ABBREVIATIONS, expand_state_abbreviations, state_code, state_name};
