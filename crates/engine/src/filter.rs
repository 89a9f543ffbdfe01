//! Client-side narrowing of an already fetched result window.
//!
//! Filtering never fetches and never touches the pager's cursor: "load more"
//! keeps following the server, the filter only decides what is visible.
use api_types::transaction::Transaction;

/// Text a post-filter matches against.
pub trait SearchText {
    fn search_text(&self) -> String;
}

impl SearchText for Transaction {
    fn search_text(&self) -> String {
        let merchant_data = self
            .merchant_data
            .as_ref()
            .and_then(|data| data.description.as_deref());
        [
            self.description.as_deref(),
            self.merchant_description.as_deref(),
            self.memo.as_deref(),
            merchant_data,
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Case-insensitive substring filter. Blank `text` keeps everything.
pub fn post_filter<'a, T: SearchText>(items: &'a [T], text: &str) -> Vec<&'a T> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.search_text().to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::transaction::MerchantData;
    use chrono::DateTime;

    fn tx(id: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            card_id: None,
            amount_cents: 1000,
            status: None,
            created_at: DateTime::parse_from_rfc3339("2026-10-01T10:00:00+00:00").unwrap(),
            description: None,
            merchant_description: None,
            memo: None,
            merchant_data: None,
        }
    }

    #[test]
    fn matches_any_text_field_case_insensitively() {
        let mut a = tx("a");
        a.description = Some("Coffee beans".to_string());
        let mut b = tx("b");
        b.memo = Some("team COFFEE".to_string());
        let mut c = tx("c");
        c.merchant_data = Some(MerchantData {
            description: Some("Blue Bottle Coffee".to_string()),
            ..Default::default()
        });
        let mut d = tx("d");
        d.merchant_description = Some("Airline".to_string());

        let items = vec![a, b, c, d];
        let ids: Vec<&str> = post_filter(&items, "coffee")
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn blank_filter_keeps_everything() {
        let items = vec![tx("a"), tx("b")];
        assert_eq!(post_filter(&items, "  ").len(), 2);
    }

    #[test]
    fn transaction_without_text_never_matches() {
        let items = vec![tx("a")];
        assert!(post_filter(&items, "x").is_empty());
    }
}
