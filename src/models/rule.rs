//! Keyword -> category rules for merchant categorization
//!
//! Rules are an ordered list; order is significant because the first
//! matching rule wins.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizationRule {
    /// Lowercase substring searched for in the merchant name
    pub keyword: String,

    /// Category assigned on match
    pub category: String,
}

impl CategorizationRule {
    /// Create a rule; the keyword is lowercased
    pub fn new(keyword: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into().to_lowercase(),
            category: category.into(),
        }
    }

    /// Whether the rule applies to an already-lowercased merchant name
    ///
    /// A blank keyword never matches.
    pub fn matches_lowercase(&self, merchant_lower: &str) -> bool {
        let keyword = self.keyword.trim();
        !keyword.is_empty() && merchant_lower.contains(&keyword.to_lowercase())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.keyword.trim().is_empty() {
            return Err("rule keyword cannot be blank".to_string());
        }
        if self.category.trim().is_empty() {
            return Err(format!("rule '{}' has a blank category", self.keyword));
        }
        Ok(())
    }
}

impl fmt::Display for CategorizationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.keyword, self.category)
    }
}

/// The built-in rule set
pub fn default_rules() -> Vec<CategorizationRule> {
    vec![
        CategorizationRule::new("swiggy", "Food"),
        CategorizationRule::new("zomato", "Food"),
        CategorizationRule::new("uber", "Travel"),
        CategorizationRule::new("amazon", "Shopping"),
        CategorizationRule::new("salary", "Salary"),
        CategorizationRule::new("netflix", "Entertainment"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_is_lowercased() {
        let rule = CategorizationRule::new("NetFlix", "Entertainment");
        assert_eq!(rule.keyword, "netflix");
        assert!(rule.matches_lowercase("netflix subscription"));
    }

    #[test]
    fn test_blank_keyword_never_matches() {
        let rule = CategorizationRule::new("  ", "Everything");
        assert!(!rule.matches_lowercase("anything"));
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_deserialized_keyword_is_matched_case_insensitively() {
        let rule: CategorizationRule =
            serde_json::from_str(r#"{"keyword": "Uber", "category": "Travel"}"#).unwrap();
        assert!(rule.matches_lowercase("uber trip"));
    }

    #[test]
    fn test_default_rules_are_valid() {
        for rule in default_rules() {
            assert!(rule.validate().is_ok(), "{}", rule);
        }
    }
}
