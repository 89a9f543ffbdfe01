//! Plain-text rendering of backend records.
use api_types::{
    card::Card, card_group::CardGroup, constraint::SpendingConstraintPayload,
    transaction::Transaction,
};
use chrono_tz::Tz;
use engine::{MoneyCents, Resolvers};
use serde::Serialize;

use crate::error::Result;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn join_labels(items: &[String], label: impl Fn(&str) -> String) -> String {
    items.iter().map(|item| label(item)).collect::<Vec<_>>().join(", ")
}

/// One-line summary of a constraint, using labels when they are loaded.
pub fn describe_constraint(
    constraint: Option<&SpendingConstraintPayload>,
    resolvers: Option<&Resolvers>,
) -> String {
    let Some(c) = constraint.filter(|c| !c.is_unrestricted()) else {
        return "unrestricted".to_string();
    };

    let mut parts = Vec::new();
    if let Some(countries) = &c.country_allow {
        parts.push(format!(
            "countries: {}",
            join_labels(countries, |code| match resolvers {
                Some(r) => r.countries.label(code).to_string(),
                None => code.to_string(),
            })
        ));
    }
    if let Some(codes) = &c.mcc_allow {
        parts.push(format!(
            "mcc: {}",
            join_labels(codes, |code| match resolvers {
                Some(r) => format!("{code} {}", r.mcc_codes.label(code)),
                None => code.to_string(),
            })
        ));
    }
    if let Some(categories) = &c.merchant_category_allow {
        parts.push(format!(
            "categories: {}",
            join_labels(categories, |id| match resolvers {
                Some(r) => r.merchant_categories.label(id).to_string(),
                None => id.to_string(),
            })
        ));
    }
    if let Some(merchants) = &c.merchant_allow {
        let names = c
            .user_data
            .as_ref()
            .map(|data| data.merchant_names.as_slice())
            .unwrap_or_default();
        let shown: Vec<String> = merchants
            .iter()
            .enumerate()
            .map(|(idx, id)| names.get(idx).cloned().unwrap_or_else(|| id.clone()))
            .collect();
        parts.push(format!("merchants: {}", shown.join(", ")));
    }
    if let Some(cents) = c.utilization_limit_amount_cents {
        parts.push(format!("daily: {}", MoneyCents::new(cents)));
    }
    if let Some(cents) = c.minimum_amount_cents {
        parts.push(format!("min: {}", MoneyCents::new(cents)));
    }
    if let Some(cents) = c.maximum_amount_cents {
        parts.push(format!("max: {}", MoneyCents::new(cents)));
    }
    parts.join("; ")
}

pub fn card_line(card: &Card, resolvers: Option<&Resolvers>) -> String {
    format!(
        "{:<20} {:<24} {:<10} {:<6} {}",
        card.id,
        card.name,
        card.status.as_str(),
        card.last4.as_deref().unwrap_or("----"),
        describe_constraint(card.spending_constraint.as_ref(), resolvers)
    )
}

pub fn group_line(group: &CardGroup, resolvers: Option<&Resolvers>) -> String {
    format!(
        "{:<20} {:<24} {}",
        group.id,
        group.name,
        describe_constraint(group.spending_constraint.as_ref(), resolvers)
    )
}

pub fn transaction_line(tx: &Transaction, tz: Tz) -> String {
    let when = tx.created_at.with_timezone(&tz).format("%Y-%m-%d %H:%M");
    let what = tx
        .merchant_data
        .as_ref()
        .and_then(|m| m.description.as_deref())
        .or(tx.merchant_description.as_deref())
        .or(tx.description.as_deref())
        .unwrap_or("-");
    format!(
        "{when} {:>12} {:<10} {what}",
        MoneyCents::new(tx.amount_cents).to_string(),
        tx.status.as_deref().unwrap_or("")
    )
}

/// `**** **** **** 4242` unless the full number was revealed.
pub fn masked_pan(card: &Card) -> String {
    match (&card.pan, &card.last4) {
        (Some(pan), _) => pan.clone(),
        (None, Some(last4)) => format!("**** **** **** {last4}"),
        (None, None) => "unavailable".to_string(),
    }
}
