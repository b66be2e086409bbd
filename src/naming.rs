//! Naming - Sanitizer and Grammar Check
//!
//! `sanitize` rewrites any candidate into a valid bucket-style name.
//! `check_name` reports what is wrong with a name without rewriting it.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_NAME_LEN: usize = 3;
pub const MAX_NAME_LEN: usize = 63;

/// Appended to short names. Must not be a hyphen.
pub const FILLER: char = 'a';

fn is_name_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '-')
}

/// A name that satisfies the grammar. Only `sanitize` builds one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SanitizedName(String);

impl SanitizedName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SanitizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SanitizedName> for String {
    fn from(name: SanitizedName) -> Self {
        name.0
    }
}

/// Rewrite `candidate` into a valid name. Never fails; the floor is `"aaa"`.
///
/// Placeholder text (`${AWS::Region}` and the like) is treated as ordinary
/// characters, so a placeholder embedded in the candidate gets mangled.
pub fn sanitize(candidate: &str) -> SanitizedName {
    let lowered = candidate.to_lowercase();

    // Disallowed runs and hyphen runs both end up as a single hyphen.
    let mut name = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        let c = if is_name_char(c) { c } else { '-' };
        if c == '-' && name.ends_with('-') {
            continue;
        }
        name.push(c);
    }

    let mut name = name.trim_matches('-').to_string();

    // Only ASCII is left, so byte length is char length.
    if name.len() > MAX_NAME_LEN {
        name.truncate(MAX_NAME_LEN);
        let kept = name.trim_end_matches('-').len();
        name.truncate(kept);
    }

    while name.len() < MIN_NAME_LEN {
        name.push(FILLER);
    }

    SanitizedName(name)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NameViolation {
    pub rule: String,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameCheck {
    pub valid: bool,
    pub name: String,
    pub violations: Vec<NameViolation>,
}

impl NameCheck {
    pub fn violated(&self, rule: &str) -> bool {
        self.violations.iter().any(|v| v.rule == rule)
    }
}

/// Grammar rule trait - produces violations
pub trait NameRule {
    fn name(&self) -> &'static str;
    fn check(&self, name: &str) -> Vec<NameViolation>;
}

// --- Concrete Rules ---

pub struct LengthRule;

impl NameRule for LengthRule {
    fn name(&self) -> &'static str { "length" }

    fn check(&self, name: &str) -> Vec<NameViolation> {
        let len = name.chars().count();
        if (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
            return vec![];
        }

        let remediation = if len < MIN_NAME_LEN {
            format!("Pad the name to at least {} characters", MIN_NAME_LEN)
        } else {
            format!("Shorten the name to at most {} characters", MAX_NAME_LEN)
        };

        vec![NameViolation {
            rule: self.name().to_string(),
            message: "Name length out of range".to_string(),
            expected: Some(format!("{}..={} characters", MIN_NAME_LEN, MAX_NAME_LEN)),
            actual: Some(format!("{} characters", len)),
            remediation: vec![remediation],
        }]
    }
}

pub struct CharsetRule;

impl NameRule for CharsetRule {
    fn name(&self) -> &'static str { "charset" }

    fn check(&self, name: &str) -> Vec<NameViolation> {
        let mut bad: Vec<char> = name.chars().filter(|c| !is_name_char(*c)).collect();
        if bad.is_empty() {
            return vec![];
        }
        bad.sort_unstable();
        bad.dedup();

        vec![NameViolation {
            rule: self.name().to_string(),
            message: "Name contains characters outside [a-z0-9-]".to_string(),
            expected: Some("[a-z0-9-]".to_string()),
            actual: Some(bad.into_iter().collect()),
            remediation: vec![
                "Lowercase the name".to_string(),
                "Replace other characters with a hyphen".to_string(),
            ],
        }]
    }
}

pub struct HyphenEdgeRule;

impl NameRule for HyphenEdgeRule {
    fn name(&self) -> &'static str { "hyphen_edges" }

    fn check(&self, name: &str) -> Vec<NameViolation> {
        let mut violations = vec![];

        if name.starts_with('-') {
            violations.push(NameViolation {
                rule: self.name().to_string(),
                message: "Name starts with a hyphen".to_string(),
                expected: None,
                actual: None,
                remediation: vec!["Remove leading hyphens".to_string()],
            });
        }
        if name.ends_with('-') {
            violations.push(NameViolation {
                rule: self.name().to_string(),
                message: "Name ends with a hyphen".to_string(),
                expected: None,
                actual: None,
                remediation: vec!["Remove trailing hyphens".to_string()],
            });
        }

        violations
    }
}

pub struct HyphenRunRule;

impl NameRule for HyphenRunRule {
    fn name(&self) -> &'static str { "hyphen_runs" }

    fn check(&self, name: &str) -> Vec<NameViolation> {
        if !name.contains("--") {
            return vec![];
        }
        vec![NameViolation {
            rule: self.name().to_string(),
            message: "Name contains consecutive hyphens".to_string(),
            expected: None,
            actual: None,
            remediation: vec!["Collapse hyphen runs into a single hyphen".to_string()],
        }]
    }
}

/// Runs every grammar rule against a name
pub struct NameValidator {
    rules: Vec<Box<dyn NameRule>>,
}

impl NameValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(LengthRule),
                Box::new(CharsetRule),
                Box::new(HyphenEdgeRule),
                Box::new(HyphenRunRule),
            ],
        }
    }

    pub fn check(&self, name: &str) -> NameCheck {
        let violations: Vec<_> = self.rules.iter()
            .flat_map(|rule| rule.check(name))
            .collect();

        NameCheck {
            valid: violations.is_empty(),
            name: name.to_string(),
            violations,
        }
    }
}

impl Default for NameValidator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn check_name(name: &str) -> NameCheck {
    NameValidator::new().check(name)
}

pub fn is_valid_name(name: &str) -> bool {
    let len = name.len();
    (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len)
        && name.chars().all(is_name_char)
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--")
}
