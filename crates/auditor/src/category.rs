use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};

/// Category assigned when no rule matches
pub const FALLBACK_CATEGORY: &str = "other";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Prefix,
    Suffix,
}

/// Names matching any of `patterns` belong to `category`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryRule {
    pub category: String,
    pub kind: MatchKind,
    pub patterns: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: &str, kind: MatchKind, patterns: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            kind,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| match self.kind {
            MatchKind::Prefix => name.starts_with(pattern.as_str()),
            MatchKind::Suffix => name.ends_with(pattern.as_str()),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() {
            return Err(AuditError::invalid_config("category name must not be empty"));
        }
        if self.patterns.iter().any(|p| p.is_empty()) {
            return Err(AuditError::invalid_config(format!(
                "category '{}' has an empty pattern",
                self.category
            )));
        }
        Ok(())
    }
}

/// Naming conventions of the skill corpus, checked in order
pub fn default_rules() -> Vec<CategoryRule> {
    use MatchKind::{Prefix, Suffix};
    vec![
        CategoryRule::new(
            "language-specific",
            Prefix,
            &["python-", "javascript-", "nextjs-"],
        ),
        CategoryRule::new("linting", Suffix, &["-linter"]),
        CategoryRule::new("testing", Suffix, &["-test-creator", "-pytest"]),
        CategoryRule::new("git/jira", Prefix, &["git-", "jira-"]),
        CategoryRule::new("opentofu", Prefix, &["opentofu-"]),
        CategoryRule::new("opencode-meta", Prefix, &["opencode-"]),
        CategoryRule::new("project-setup", Suffix, &["-setup", "-standard"]),
        CategoryRule::new("workflow", Suffix, &["-workflow"]),
        CategoryRule::new("framework", Suffix, &["-framework"]),
    ]
}

/// First matching rule wins
pub fn categorize<'a>(rules: &'a [CategoryRule], name: &str) -> &'a str {
    rules
        .iter()
        .find(|rule| rule.matches(name))
        .map(|rule| rule.category.as_str())
        .unwrap_or(FALLBACK_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let rules = default_rules();
        assert_eq!(categorize(&rules, "python-ruff-linter"), "language-specific");
        assert_eq!(categorize(&rules, "eslint-linter"), "linting");
        assert_eq!(categorize(&rules, "nextjs-unit-test-creator"), "language-specific");
        assert_eq!(categorize(&rules, "jira-git-workflow"), "git/jira");
        assert_eq!(categorize(&rules, "opentofu-provider-setup"), "opentofu");
        assert_eq!(categorize(&rules, "opencode-skill-auditor"), "opencode-meta");
        assert_eq!(categorize(&rules, "typescript-dry-principle"), FALLBACK_CATEGORY);
        assert_eq!(categorize(&rules, "coverage-readme-workflow"), "workflow");
        assert_eq!(categorize(&rules, "linting-framework"), "framework");
        assert_eq!(categorize(&rules, "tdd-standard"), "project-setup");
    }

    #[test]
    fn empty_rules_fall_back() {
        assert_eq!(categorize(&[], "anything"), FALLBACK_CATEGORY);
    }

    #[test]
    fn rejects_empty_patterns() {
        let rule = CategoryRule::new("broken", MatchKind::Prefix, &[""]);
        assert!(rule.validate().is_err());
        assert!(CategoryRule::new(" ", MatchKind::Suffix, &["-x"]).validate().is_err());
    }
}
