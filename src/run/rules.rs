use anyhow::{bail, Context, Result};

use super::util::{category_name, find_category, rule_line, truncate};
use crate::categorize::{test_pattern, Categorizer};
use crate::db::Database;
use crate::validate::{self, RuleDraft};

pub(crate) fn add(db: &mut Database, pattern: &str, category: &str, priority: i32) -> Result<()> {
    let categories = db.get_categories()?;
    let draft = RuleDraft {
        contains: pattern.to_string(),
        category_id: find_category(&categories, category)?.id,
        priority,
    };
    let rule = validate::rule(&draft)?;
    let id = db.insert_rule(&rule)?;
    println!(
        "Added rule #{id}: \"{}\" → {} (priority {})",
        rule.contains,
        category_name(&categories, Some(rule.category_id)),
        rule.priority
    );
    Ok(())
}

pub(crate) fn edit(
    db: &mut Database,
    id: i64,
    pattern: Option<String>,
    category: Option<String>,
    priority: Option<i32>,
) -> Result<()> {
    let mut rule = db
        .get_rule(id)?
        .with_context(|| format!("No rule with ID {id}"))?;
    let categories = db.get_categories()?;

    let contains = pattern.unwrap_or_else(|| rule.contains.clone());
    let category_id = match category.as_deref() {
        Some(key) => find_category(&categories, key)?
            .id
            .context("Category has no ID")?,
        None => rule.category_id,
    };
    let priority = priority.unwrap_or(rule.priority);

    rule.edit(&contains, category_id, priority)?;
    db.update_rule(&rule)?;
    println!(
        "Updated rule #{id}: \"{}\" → {} (priority {})",
        rule.contains,
        category_name(&categories, Some(rule.category_id)),
        rule.priority
    );
    Ok(())
}

pub(crate) fn list(db: &mut Database) -> Result<()> {
    let rules = db.get_rules()?;
    if rules.is_empty() {
        println!("No rules");
        return Ok(());
    }
    let categories = db.get_categories()?;

    println!("{:<4} {:<30} {:<20} {:>8}", "ID", "Contains", "Category", "Priority");
    println!("{}", rule_line(65));
    for rule in &rules {
        println!(
            "{:<4} {:<30} {:<20} {:>8}",
            rule.id.unwrap_or(0),
            truncate(&rule.contains, 30),
            truncate(&category_name(&categories, Some(rule.category_id)), 20),
            rule.priority,
        );
    }
    Ok(())
}

pub(crate) fn delete(db: &mut Database, id: i64) -> Result<()> {
    if !db.delete_rule(id)? {
        bail!("No rule with ID {id}");
    }
    println!("Deleted rule #{id}");
    Ok(())
}

/// Preview a pattern against the given samples, or against recent
/// transaction descriptions when none are given.
pub(crate) fn test(db: &mut Database, pattern: &str, samples: Vec<String>, limit: u32) -> Result<()> {
    let samples = if samples.is_empty() {
        db.get_recent_descriptions(limit)?
    } else {
        samples
    };
    if samples.is_empty() {
        println!("No descriptions to test against");
        return Ok(());
    }

    let results = test_pattern(pattern, &samples);
    for r in &results {
        let mark = if r.would_apply { "✓" } else { " " };
        println!("  {mark} {}", r.description);
    }
    let hits = results.iter().filter(|r| r.would_apply).count();
    println!("{hits} of {} would match \"{pattern}\"", results.len());
    Ok(())
}

/// Run the saved rules over every uncategorized expense and income.
pub(crate) fn apply(db: &mut Database) -> Result<()> {
    let rules = db.get_rules()?;
    if rules.is_empty() {
        println!("No rules to apply");
        return Ok(());
    }
    let mut pending = db.get_uncategorized_transactions()?;
    let total = pending.len();

    let assigned = Categorizer::new(&rules).categorize_batch(&mut pending);
    let updated = db.update_categories_batch(&pending)?;
    tracing::info!(total, assigned, updated, "applied rules to uncategorized transactions");

    println!("Categorized {assigned} of {total} uncategorized transactions");
    Ok(())
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
