//! Code → label resolution for countries, MCCs, merchant categories and merchants.
use std::collections::HashMap;

use api_types::{
    merchant::Merchant,
    meta::{CountryOption, MccOption, MerchantCategoryOption},
};

/// A sorted option list with an in-memory index for label lookups.
#[derive(Clone, Debug, Default)]
pub struct LabelIndex {
    options: Vec<(String, String)>,
    by_code: HashMap<String, usize>,
}

impl LabelIndex {
    /// Builds the index from `(code, label)` pairs, sorted by code.
    ///
    /// Duplicate codes keep the first label seen.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut options: Vec<(String, String)> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for (code, label) in pairs {
            if seen.insert(code.clone()) {
                options.push((code, label));
            }
        }
        options.sort_by(|a, b| a.0.cmp(&b.0));
        Self::indexed(options)
    }

    /// Builds the index sorted by label (case-insensitive), for name-keyed lists.
    pub fn from_pairs_by_label(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut index = Self::from_pairs(pairs);
        index
            .options
            .sort_by_key(|(_, label)| label.to_lowercase());
        Self::indexed(index.options)
    }

    fn indexed(options: Vec<(String, String)>) -> Self {
        let by_code = options
            .iter()
            .enumerate()
            .map(|(idx, (code, _))| (code.clone(), idx))
            .collect();
        Self { options, by_code }
    }

    pub fn countries(options: &[CountryOption]) -> Self {
        Self::from_pairs(
            options
                .iter()
                .map(|o| (o.code.trim().to_ascii_uppercase(), o.name.clone())),
        )
    }

    pub fn mcc_codes(options: &[MccOption]) -> Self {
        Self::from_pairs(
            options
                .iter()
                .map(|o| (o.code.clone(), o.description.clone())),
        )
    }

    pub fn merchant_categories(options: &[MerchantCategoryOption]) -> Self {
        Self::from_pairs_by_label(options.iter().map(|o| (o.id.clone(), o.name.clone())))
    }

    /// Returns the label for `code`, if known.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.by_code
            .get(code)
            .map(|idx| self.options[*idx].1.as_str())
    }

    /// Returns the label for `code`, falling back to the code itself.
    pub fn label<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).unwrap_or(code)
    }

    /// Options in display order.
    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }
}

/// Merchant id → name, fed from every merchant page seen in a session.
#[derive(Clone, Debug, Default)]
pub struct MerchantDirectory {
    names: HashMap<String, String>,
}

impl MerchantDirectory {
    pub fn remember(&mut self, merchants: &[Merchant]) {
        for merchant in merchants {
            self.names
                .insert(merchant.id.clone(), merchant.name.clone());
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Returns the merchant name, falling back to the id itself.
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).unwrap_or(id)
    }
}

/// Label lookups for all four restriction dimensions.
#[derive(Clone, Debug, Default)]
pub struct Resolvers {
    pub countries: LabelIndex,
    pub mcc_codes: LabelIndex,
    pub merchant_categories: LabelIndex,
    pub merchants: MerchantDirectory,
}

impl Resolvers {
    pub fn new(
        countries: &[CountryOption],
        mcc_codes: &[MccOption],
        merchant_categories: &[MerchantCategoryOption],
    ) -> Self {
        Self {
            countries: LabelIndex::countries(countries),
            mcc_codes: LabelIndex::mcc_codes(mcc_codes),
            merchant_categories: LabelIndex::merchant_categories(merchant_categories),
            merchants: MerchantDirectory::default(),
        }
    }
}
