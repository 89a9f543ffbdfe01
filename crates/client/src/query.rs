use std::collections::BTreeMap;

/// Transaction listing scope plus `filter:<key>=<value>` pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub account_id: String,
    pub virtual_account_id: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl TransactionQuery {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Self::default()
        }
    }

    pub fn virtual_account(mut self, id: impl Into<String>) -> Self {
        self.virtual_account_id = Some(id.into());
        self
    }

    /// Sets a filter; an empty value removes it.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value.trim().to_string());
        }
        self
    }

    /// Query-string pairs in wire order. Empty values never reach the wire.
    pub fn to_params(&self, cursor: Option<&str>) -> Vec<(String, String)> {
        let mut params = vec![("accountId".to_string(), self.account_id.clone())];
        if let Some(id) = self.virtual_account_id.as_deref().filter(|id| !id.is_empty()) {
            params.push(("virtualAccountId".to_string(), id.to_string()));
        }
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        params.extend(
            self.filters
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (format!("filter:{key}"), value.clone())),
        );
        params
    }
}
