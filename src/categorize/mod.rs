use crate::models::{Rule, Transaction};

/// Rules pre-sorted by priority (desc) then id (asc), with lowercased patterns,
/// so the first hit is always the winning rule.
pub(crate) struct Categorizer {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    pattern: String,
    category_id: i64,
}

impl Categorizer {
    pub(crate) fn new(rules: &[Rule]) -> Self {
        let mut ordered: Vec<&Rule> = rules.iter().collect();
        ordered.sort_by_key(|r| selection_key(r));

        let compiled = ordered
            .into_iter()
            .map(|r| CompiledRule {
                pattern: r.contains.to_lowercase(),
                category_id: r.category_id,
            })
            .collect();

        Self { rules: compiled }
    }

    pub(crate) fn categorize(&self, description: &str) -> Option<i64> {
        let desc_lower = description.to_lowercase();
        self.rules
            .iter()
            .find(|rule| desc_lower.contains(&rule.pattern))
            .map(|rule| rule.category_id)
    }

    /// Fill in the category of every uncategorized expense/income transaction.
    /// Returns how many were assigned.
    pub(crate) fn categorize_batch(&self, transactions: &mut [Transaction]) -> usize {
        let mut assigned = 0;
        for txn in transactions.iter_mut() {
            if txn.category_id.is_some() || !txn.tx_type.is_categorized() {
                continue;
            }
            txn.category_id = self.categorize(&txn.description);
            if txn.category_id.is_some() {
                assigned += 1;
            }
        }
        assigned
    }
}

/// Sort key: higher priority first, then lower id. Unsaved rules lose ties.
fn selection_key(rule: &Rule) -> (std::cmp::Reverse<i32>, i64) {
    (std::cmp::Reverse(rule.priority), rule.id.unwrap_or(i64::MAX))
}

/// Case-insensitive substring test shared by matching and previews.
pub(crate) fn pattern_matches(pattern: &str, description: &str) -> bool {
    description.to_lowercase().contains(&pattern.to_lowercase())
}

/// Category of the winning rule for `description`, if any rule matches.
pub(crate) fn match_category(description: &str, rules: &[Rule]) -> Option<i64> {
    rules
        .iter()
        .filter(|r| pattern_matches(&r.contains, description))
        .min_by_key(|r| selection_key(r))
        .map(|r| r.category_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RuleTestMatch {
    pub(crate) description: String,
    pub(crate) would_apply: bool,
}

/// Dry-run a candidate pattern against sample descriptions, in input order.
/// Only the candidate is consulted; saved rules and priorities play no part.
pub(crate) fn test_pattern(pattern: &str, samples: &[String]) -> Vec<RuleTestMatch> {
    samples
        .iter()
        .map(|description| RuleTestMatch {
            description: description.clone(),
            would_apply: pattern_matches(pattern, description),
        })
        .collect()
}

/// Category for a transaction about to be created. An explicit choice always
/// wins; transfers are never categorized.
pub(crate) fn category_for_new(txn: &Transaction, rules: &[Rule]) -> Option<i64> {
    if !txn.tx_type.is_categorized() {
        return None;
    }
    if txn.category_id.is_some() {
        return txn.category_id;
    }
    match_category(&txn.description, rules)
}

#[cfg(test)]
mod tests;
