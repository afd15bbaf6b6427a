use anyhow::{bail, Context, Result};

use super::util::{find_category, rule_line};
use crate::db::Database;
use crate::models::{Category, CategoryType};

pub(crate) fn add(
    db: &mut Database,
    name: String,
    category_type: &str,
    parent: Option<String>,
    icon: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let name = name.trim().to_string();
    if name.is_empty() {
        bail!("Category name is required");
    }
    let category_type = CategoryType::parse(category_type)
        .with_context(|| format!("Invalid category type '{category_type}', expected expense or income"))?;

    let categories = db.get_categories()?;
    if Category::find_by_name(&categories, &name).is_some() {
        bail!("Category '{name}' already exists");
    }

    let mut cat = Category::new(name, category_type);
    cat.parent_id = match parent {
        Some(key) => find_category(&categories, &key)?.id,
        None => None,
    };
    cat.icon = icon.unwrap_or_default();
    cat.color = color.unwrap_or_default();

    let id = db.insert_category(&cat)?;
    println!("Added category #{id}: {cat} ({})", cat.category_type);
    Ok(())
}

pub(crate) fn list(db: &mut Database) -> Result<()> {
    let categories = db.get_categories()?;
    println!("{:<4} {:<24} {:<8} {:<8} Parent", "ID", "Name", "Type", "Color");
    println!("{}", rule_line(60));
    for cat in &categories {
        let parent = cat
            .parent_id
            .and_then(|id| Category::find_by_id(&categories, id))
            .map(|p| p.name.as_str())
            .unwrap_or("");
        println!(
            "{:<4} {:<24} {:<8} {:<8} {}",
            cat.id.unwrap_or(0),
            cat.to_string(),
            cat.category_type,
            cat.color,
            parent,
        );
    }
    Ok(())
}
