//! The ordered payer rule table.
//!
//! Rules are evaluated top to bottom against the cleaned payer text and the
//! first match wins. Patterns are not mutually exclusive ("The Guardian" also
//! contains "guardian"), so the order here is part of the behavior.

use std::sync::LazyLock;

use regex::Regex;

/// What a rule produces once its pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStrategy {
    /// A fixed canonical name.
    Canonical(&'static str),
    /// A family tag followed by the region named after the match, with state
    /// codes expanded (`Delta Dental of CA` -> `DD California`).
    RegionFamily {
        tag: &'static str,
        /// Pattern whose first group captures the trailing region.
        extract: &'static str,
    },
}

/// One entry of the rule table. Patterns are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayerRule {
    pub pattern: &'static str,
    pub strategy: RuleStrategy,
}

impl PayerRule {
    const fn canonical(pattern: &'static str, output: &'static str) -> Self {
        Self {
            pattern,
            strategy: RuleStrategy::Canonical(output),
        }
    }

    const fn family(pattern: &'static str, tag: &'static str, extract: &'static str) -> Self {
        Self {
            pattern,
            strategy: RuleStrategy::RegionFamily { tag, extract },
        }
    }

    /// Output when the rule matches and no region is captured.
    pub fn base_output(&self) -> &'static str {
        match self.strategy {
            RuleStrategy::Canonical(output) => output,
            RuleStrategy::RegionFamily { tag, .. } => tag,
        }
    }
}

/// Family tag for the Delta Dental plans.
pub const DELTA_DENTAL_TAG: &str = "DD";
/// Family tag for the Blue Cross / Blue Shield plans.
pub const BCBS_TAG: &str = "BCBS";

/// Payer rules in priority order.
pub const PAYER_RULES: &[PayerRule] = &[
    PayerRule::family(
        r"delta\s+dental",
        DELTA_DENTAL_TAG,
        r"delta\s+dental\s+(?:of\s+)?(.+)",
    ),
    PayerRule::family(
        r"bcbs|blue\s+cross|blue\s+shield",
        BCBS_TAG,
        r"(?:bcbs|blue\s+cross\s+blue\s+shield|blue\s+cross|blue\s+shield)\s+(?:of\s+)?(.+)",
    ),
    PayerRule::canonical(r"metlife|met\s+life", "Metlife"),
    PayerRule::canonical(r"cigna", "Cigna"),
    PayerRule::canonical(r"aarp", "AARP"),
    PayerRule::canonical(r"uhc|united\s*healthcare|united\s*health\s*care", "UHC"),
    PayerRule::canonical(r"teamcare", "Teamcare"),
    PayerRule::canonical(r"humana", "Humana"),
    PayerRule::canonical(r"aetna", "Aetna"),
    PayerRule::canonical(r"guardian", "Guardian"),
    PayerRule::canonical(r"anthem", "Anthem"),
    PayerRule::canonical(r"g\s*e\s*h\s*a", "GEHA"),
    PayerRule::canonical(r"principal", "Principal"),
    PayerRule::canonical(r"ameritas", "Ameritas"),
    PayerRule::canonical(r"physicians\s+mutual", "Physicians Mutual"),
    PayerRule::canonical(r"mutual\s+of\s+omaha", "Mutual Omaha"),
    PayerRule::canonical(r"sunlife|sun\s+life", "Sunlife"),
    PayerRule::canonical(r"liberty\s+dental", "Liberty Dental Plan"),
    PayerRule::canonical(r"careington", "Careington Benefit Solutions"),
    PayerRule::canonical(r"automated\s+benefit", "Automated Benefit Services Inc"),
    PayerRule::canonical(r"network\s+health", "Network Health Wisconsin"),
    PayerRule::canonical(r"regence", "REGENCE BCBS"),
    PayerRule::canonical(r"united\s+concordia", "United Concordia"),
    PayerRule::canonical(r"medical\s+mutual", "Medical Mutual"),
    PayerRule::canonical(r"blue\s+care\s+dental", "Blue Care Dental"),
    PayerRule::canonical(r"dominion\s+dental", "Dominion Dental"),
    PayerRule::canonical(r"carefirst", "CareFirst BCBS"),
    PayerRule::canonical(r"health\s+partners", "Health Partners"),
    PayerRule::canonical(r"keenan", "Keenan"),
    PayerRule::canonical(r"wilson\s+mcshane", "Wilson McShane- Delta Dental"),
    PayerRule::canonical(r"standard\s+(?:life\s+)?insurance", "Standard Life Insurance"),
    PayerRule::canonical(r"plan\s+for\s+health", "Plan for Health"),
    PayerRule::canonical(r"kansas\s+city", "Kansas City"),
    // Shadowed by "guardian" above; kept so the table mirrors the payer list.
    PayerRule::canonical(r"the\s+guardian", "The Guardian"),
    PayerRule::canonical(r"community\s+dental", "Community Dental Associates"),
    // Shadowed by the Delta Dental family rule.
    PayerRule::canonical(r"northeast\s+delta\s+dental", "Northeast Delta Dental"),
    PayerRule::canonical(r"say\s+cheese\s+dental", "SAY CHEESE DENTAL NETWORK"),
    PayerRule::canonical(r"dentaquest", "Dentaquest"),
    PayerRule::canonical(r"umr", "UMR"),
    PayerRule::canonical(r"mhbp", "MHBP"),
    PayerRule::canonical(r"united\s+states\s+army", "United States Army"),
    PayerRule::canonical(
        r"conversion\s+default",
        "CONVERSION DEFAULT - Do NOT Delete! Change Pt Ins!",
    ),
    PayerRule::canonical(r"equitable", "Equitable"),
    PayerRule::canonical(r"manhattan\s+life", "Manhattan Life"),
];

pub(crate) struct CompiledRule {
    pub(crate) rule: &'static PayerRule,
    pub(crate) detect: Regex,
    pub(crate) extract: Option<Regex>,
}

fn case_insensitive(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("Invalid payer rule regex")
}

pub(crate) static COMPILED_RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    PAYER_RULES
        .iter()
        .map(|rule| CompiledRule {
            rule,
            detect: case_insensitive(rule.pattern),
            extract: match rule.strategy {
                RuleStrategy::RegionFamily { extract, .. } => Some(case_insensitive(extract)),
                RuleStrategy::Canonical(_) => None,
            },
        })
        .collect()
});

/// The rule table in evaluation order.
pub fn payer_rules() -> &'static [PayerRule] {
    PAYER_RULES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_compiles() {
        assert_eq!(COMPILED_RULES.len(), PAYER_RULES.len());
    }

    #[test]
    fn families_come_first() {
        assert_eq!(PAYER_RULES[0].base_output(), DELTA_DENTAL_TAG);
        assert_eq!(PAYER_RULES[1].base_output(), BCBS_TAG);
        assert!(
            PAYER_RULES[2..]
                .iter()
                .all(|rule| matches!(rule.strategy, RuleStrategy::Canonical(_)))
        );
    }

    #[test]
    fn fixed_vocabulary_size() {
        assert_eq!(PAYER_RULES.len() - 2, 42);
    }
}
