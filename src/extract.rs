//! Identifier extraction: independent single-group regex rules applied to one line.

use regex::Regex;

use crate::error::{Result, ScanError};

/// Default rules: `userCode=<word>` and a JSON `"userId":"<word>"` pair.
pub const DEFAULT_RULES: [(&str, &str); 2] = [
    ("user_code", r"userCode=(\w+)"),
    ("user_id", r#""userId":"(\w+)""#),
];

/// A compiled pattern with exactly one capturing group. Immutable once built.
#[derive(Clone, Debug)]
pub struct ExtractionRule {
    name: String,
    regex: Regex,
}

impl ExtractionRule {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| ScanError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        // captures_len counts the implicit whole-match group.
        let found = regex.captures_len() - 1;
        if found != 1 {
            return Err(ScanError::RuleCaptureGroups {
                pattern: pattern.to_string(),
                found,
            });
        }
        Ok(Self {
            name: name.into(),
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Captured value of the leftmost match, if any.
    pub fn apply<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Applies every configured rule to a line. Pure; safe to share across workers.
#[derive(Clone, Debug)]
pub struct IdentifierExtractor {
    rules: Vec<ExtractionRule>,
}

impl IdentifierExtractor {
    pub fn new(rules: Vec<ExtractionRule>) -> Self {
        Self { rules }
    }

    /// Build from raw patterns, naming them `rule_0`, `rule_1`, ...
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let rules = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| ExtractionRule::new(format!("rule_{i}"), p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    /// One identifier per matching rule, in rule order. A match on one rule never
    /// short-circuits the others.
    pub fn extract(&self, line: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter_map(|rule| rule.apply(line))
            .map(str::to_owned)
            .collect()
    }
}

impl Default for IdentifierExtractor {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(name, pattern)| ExtractionRule::new(*name, pattern))
            .collect::<Result<Vec<_>>>()
            .unwrap_or_else(|e| unreachable!("built-in rule failed to compile: {e}"));
        Self::new(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_code_only() {
        let ex = IdentifierExtractor::default();
        assert_eq!(ex.extract("INFO login userCode=ABC123 ok"), vec!["ABC123"]);
    }

    #[test]
    fn test_user_id_only() {
        let ex = IdentifierExtractor::default();
        assert_eq!(ex.extract(r#"{"userId":"XYZ789","x":1}"#), vec!["XYZ789"]);
    }

    #[test]
    fn test_both_rules_on_one_line() {
        let ex = IdentifierExtractor::default();
        let line = r#"userCode=AAA {"userId":"BBB"}"#;
        assert_eq!(ex.extract(line), vec!["AAA", "BBB"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let ex = IdentifierExtractor::default();
        assert!(ex.extract("nothing to see here").is_empty());
        assert!(ex.extract("").is_empty());
        assert!(ex.extract("userCode=").is_empty());
    }

    #[test]
    fn test_only_first_match_per_rule() {
        let ex = IdentifierExtractor::default();
        assert_eq!(ex.extract("userCode=first userCode=second"), vec!["first"]);
    }

    #[test]
    fn test_word_chars_stop_capture() {
        let ex = IdentifierExtractor::default();
        assert_eq!(ex.extract("userCode=abc_1-def"), vec!["abc_1"]);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let ex = IdentifierExtractor::default();
        let line = r#"userCode=Q1 "userId":"Q2""#;
        assert_eq!(ex.extract(line), ex.extract(line));
    }

    #[test]
    fn test_rule_requires_one_group() {
        assert!(matches!(
            ExtractionRule::new("none", r"userCode=\w+"),
            Err(ScanError::RuleCaptureGroups { found: 0, .. })
        ));
        assert!(matches!(
            ExtractionRule::new("two", r"(a)(b)"),
            Err(ScanError::RuleCaptureGroups { found: 2, .. })
        ));
        assert!(ExtractionRule::new("ok", r"id=(\d+)").is_ok());
    }

    #[test]
    fn test_invalid_rule_pattern() {
        assert!(matches!(
            ExtractionRule::new("bad", r"(unclosed"),
            Err(ScanError::Pattern { .. })
        ));
    }

    #[test]
    fn test_from_patterns() {
        let ex = IdentifierExtractor::from_patterns(&[r"uid=(\d+)"]).unwrap();
        assert_eq!(ex.rules().len(), 1);
        assert_eq!(ex.rules()[0].name(), "rule_0");
        assert_eq!(ex.rules()[0].pattern(), r"uid=(\d+)");
        assert_eq!(ex.extract("uid=42 userCode=ignored"), vec!["42"]);
    }
}
