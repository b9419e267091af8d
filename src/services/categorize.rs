//! Categorization engine
//!
//! Assigns a category to a merchant name from an ordered keyword rule set.
//! Matching is case-insensitive substring containment and the first matching
//! rule wins. Every input, including a missing merchant, maps to a category.

use crate::models::CategorizationRule;

/// Category used when nothing matches
pub const DEFAULT_CATEGORY: &str = "Others";

/// Categorize a merchant name against `rules`, falling back to "Others"
pub fn categorize(merchant: Option<&str>, rules: &[CategorizationRule]) -> String {
    categorize_or(merchant, rules, DEFAULT_CATEGORY)
}

/// Categorize with a caller-chosen fallback category
pub fn categorize_or(merchant: Option<&str>, rules: &[CategorizationRule], fallback: &str) -> String {
    let merchant = match merchant.map(str::trim) {
        Some(m) if !m.is_empty() => m.to_lowercase(),
        _ => return fallback.to_string(),
    };

    rules
        .iter()
        .find(|rule| rule.matches_lowercase(&merchant))
        .map(|rule| rule.category.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// A rule set bundled with its fallback category
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategorizationRule>,
    fallback: String,
}

impl Categorizer {
    pub fn new(rules: Vec<CategorizationRule>) -> Self {
        Self {
            rules,
            fallback: DEFAULT_CATEGORY.to_string(),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn rules(&self) -> &[CategorizationRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn categorize(&self, merchant: Option<&str>) -> String {
        categorize_or(merchant, &self.rules, &self.fallback)
    }

    /// The rule that would fire for a merchant, if any
    pub fn matching_rule(&self, merchant: &str) -> Option<&CategorizationRule> {
        let merchant = merchant.trim().to_lowercase();
        if merchant.is_empty() {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches_lowercase(&merchant))
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(crate::models::default_rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_rules;

    fn rules() -> Vec<CategorizationRule> {
        let mut rules = default_rules();
        // overlaps with "amazon" for "Amazon Prime"
        rules.push(CategorizationRule::new("prime", "Entertainment"));
        rules
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(categorize(Some("Swiggy Order #123"), &rules()), "Food");
        assert_eq!(categorize(Some("UBER *TRIP"), &rules()), "Travel");
        assert_eq!(categorize(Some("paid via zomato"), &rules()), "Food");
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(categorize(Some("Amazon Prime"), &rules()), "Shopping");

        let mut reversed = rules();
        reversed.reverse();
        assert_eq!(categorize(Some("Amazon Prime"), &reversed), "Entertainment");
    }

    #[test]
    fn test_missing_merchant_is_others() {
        assert_eq!(categorize(None, &rules()), "Others");
        assert_eq!(categorize(Some(""), &rules()), "Others");
        assert_eq!(categorize(Some("   "), &rules()), "Others");
    }

    #[test]
    fn test_no_match_is_others() {
        assert_eq!(categorize(Some("Corner Bakery"), &rules()), "Others");
        assert_eq!(categorize(Some("Swiggy"), &[]), "Others");
    }

    #[test]
    fn test_deterministic() {
        let rules = rules();
        let first = categorize(Some("Netflix.com"), &rules);
        for _ in 0..10 {
            assert_eq!(categorize(Some("Netflix.com"), &rules), first);
        }
    }

    #[test]
    fn test_categorizer_fallback_and_matching_rule() {
        let categorizer = Categorizer::default().with_fallback("Uncategorized");
        assert_eq!(categorizer.categorize(Some("Hardware store")), "Uncategorized");
        assert_eq!(categorizer.categorize(Some("Monthly SALARY credit")), "Salary");
        assert_eq!(
            categorizer.matching_rule("netflix").map(|r| r.keyword.as_str()),
            Some("netflix")
        );
        assert!(categorizer.matching_rule("").is_none());
    }
}
