use anyhow::{bail, Context, Result};

use super::util::{find_vendor, rule_line, today, truncate};
use crate::db::Database;
use crate::models::{PurchaseStatus, Vendor};
use crate::money::{format_amount, parse_amount};
use crate::settings::Settings;
use crate::validate::{self, ItemDraft, PurchaseDraft};

// ── Vendors ───────────────────────────────────────────────────

pub(crate) fn add_vendor(db: &mut Database, name: String, cnpj: Option<String>) -> Result<()> {
    let name = name.trim().to_string();
    if name.is_empty() {
        bail!("Vendor name is required");
    }
    let mut vendor = Vendor::new(name);
    vendor.cnpj = cnpj.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
    let id = db.insert_vendor(&vendor)?;
    println!("Added vendor #{id}: {}", vendor.name);
    Ok(())
}

pub(crate) fn search_vendors(db: &mut Database, query: Option<String>) -> Result<()> {
    let vendors = db.get_vendors()?;
    let found = Vendor::search(&vendors, query.as_deref().unwrap_or(""));
    if found.is_empty() {
        println!("No vendors");
        return Ok(());
    }
    for v in found {
        match &v.cnpj {
            Some(cnpj) => println!("{:<4} {} ({cnpj})", v.id.unwrap_or(0), v.name),
            None => println!("{:<4} {}", v.id.unwrap_or(0), v.name),
        }
    }
    Ok(())
}

// ── Purchases ─────────────────────────────────────────────────

/// Parse `NAME:QTY:UNIT_PRICE`. The name may itself contain colons.
pub(crate) fn parse_item(raw: &str) -> Result<ItemDraft> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(price), Some(qty), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("Invalid item '{raw}', expected NAME:QTY:UNIT_PRICE");
    };
    let qty = qty
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Invalid quantity '{qty}' in item '{raw}'"))?;
    Ok(ItemDraft {
        item_name: name.trim().to_string(),
        qty,
        unit_price: price.trim().to_string(),
    })
}

pub(crate) fn add(
    db: &mut Database,
    settings: &Settings,
    vendor: &str,
    expected: Option<String>,
    items: &[String],
) -> Result<()> {
    let vendors = db.get_vendors()?;
    let draft = PurchaseDraft {
        vendor_id: find_vendor(&vendors, vendor)?.id,
        expected_date: expected.map(|d| d.trim().to_string()),
        items: items
            .iter()
            .map(|s| parse_item(s))
            .collect::<Result<Vec<_>>>()?,
    };
    let purchase = validate::purchase(&draft)?;
    let id = db.insert_purchase(&purchase)?;
    println!(
        "Requested purchase #{id}: {} item(s), estimated {}",
        purchase.items.len(),
        format_amount(purchase.total_estimated, &settings.currency_symbol)
    );
    Ok(())
}

pub(crate) fn list(db: &mut Database, settings: &Settings) -> Result<()> {
    let purchases = db.get_purchases()?;
    if purchases.is_empty() {
        println!("No purchases");
        return Ok(());
    }
    let vendors = db.get_vendors()?;
    let sym = &settings.currency_symbol;

    println!(
        "{:<4} {:<20} {:<10} {:<10} {:<10} {:>14} {:>14}",
        "ID", "Vendor", "Status", "Expected", "Received", "Estimated", "Real"
    );
    println!("{}", rule_line(88));
    for p in &purchases {
        let vendor = Vendor::find_by_id(&vendors, p.vendor_id).map_or("-", |v| v.name.as_str());
        println!(
            "{:<4} {:<20} {:<10} {:<10} {:<10} {:>14} {:>14}",
            p.id.unwrap_or(0),
            truncate(vendor, 20),
            p.status,
            p.expected_date.as_deref().unwrap_or("-"),
            p.received_date.as_deref().unwrap_or("-"),
            format_amount(p.total_estimated, sym),
            p.total_real.map_or_else(|| "-".to_string(), |t| format_amount(t, sym)),
        );
        for item in &p.items {
            println!(
                "       {} x {} @ {}",
                item.qty,
                item.item_name,
                format_amount(item.unit_price, sym)
            );
        }
    }
    Ok(())
}

pub(crate) fn advance(
    db: &mut Database,
    settings: &Settings,
    id: i64,
    total: Option<String>,
) -> Result<()> {
    let mut purchase = db
        .get_purchases()?
        .into_iter()
        .find(|p| p.id == Some(id))
        .with_context(|| format!("No purchase with ID {id}"))?;

    if let Some(text) = total {
        let real = parse_amount(&text).with_context(|| format!("Invalid amount: {text}"))?;
        if real < rust_decimal::Decimal::ZERO {
            bail!("Real total cannot be negative");
        }
        purchase.total_real = Some(real);
    }
    let date = today().format("%Y-%m-%d").to_string();
    let status = purchase.advance(&date)?;
    db.update_purchase(&purchase)?;

    match (status, purchase.total_real) {
        (PurchaseStatus::Received, _) => println!("Purchase #{id} received on {date}"),
        (_, Some(real)) => println!(
            "Purchase #{id} is now {status} ({})",
            format_amount(real, &settings.currency_symbol)
        ),
        _ => println!("Purchase #{id} is now {status}"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "purchases_tests.rs"]
mod tests;
