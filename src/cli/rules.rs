//! CLI commands for the categorization rules

use crate::config::Settings;
use crate::display::format_rules;
use crate::error::TrackerResult;
use crate::storage::RuleSource;

/// Show which category a merchant name would get
pub fn handle_categorize_command(settings: &Settings, merchant: &str) -> TrackerResult<()> {
    let categorizer = settings.categorizer();
    let category = categorizer.categorize(Some(merchant));

    match categorizer.matching_rule(merchant) {
        Some(rule) => println!("{} (matched '{}')", category, rule.keyword),
        None => println!("{} (no rule matched)", category),
    }
    Ok(())
}

pub fn handle_rules_command(rules: &dyn RuleSource) -> TrackerResult<()> {
    print!("{}", format_rules(&rules.list_rules()?));
    Ok(())
}
