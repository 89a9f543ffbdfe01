//! Wire types for the card-issuing backend.
//!
//! The backend speaks camelCase JSON. Every optional field is skipped when
//! absent so that request bodies only carry what the caller actually set.
use serde::{Deserialize, Serialize};

pub mod paging {
    use super::*;

    /// Offset-paged collection (cards, card groups, virtual accounts).
    ///
    /// `page` is zero-based.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PagedResult<T> {
        pub content: Vec<T>,
        pub total_pages: u32,
        pub total_elements: u64,
        pub page: u32,
    }

    /// Normalized cursor-paged chunk.
    ///
    /// `next_cursor == None` means the collection is exhausted.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CursorPage<T> {
        pub items: Vec<T>,
        pub next_cursor: Option<String>,
    }

    impl<T> CursorPage<T> {
        pub fn last(items: Vec<T>) -> Self {
            Self {
                items,
                next_cursor: None,
            }
        }
    }
}

pub mod constraint {
    use super::*;
    use chrono::NaiveDate;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum RestrictionMode {
        Allowlist,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum UtilizationPreset {
        Daily,
    }

    /// Display-only data stored next to the constraint.
    ///
    /// The backend keeps it verbatim; it is never used for enforcement.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserData {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub merchant_names: Vec<String>,
        #[serde(flatten)]
        pub extra: serde_json::Map<String, serde_json::Value>,
    }

    impl UserData {
        pub fn is_empty(&self) -> bool {
            self.merchant_names.is_empty() && self.extra.is_empty()
        }
    }

    /// Spending constraint as sent to and returned by the backend.
    ///
    /// Each `*_allow` list travels together with its `*_restriction` mode; a
    /// dimension with no items is omitted entirely.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpendingConstraintPayload {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub country_allow: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub country_restriction: Option<RestrictionMode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub mcc_allow: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub mcc_restriction: Option<RestrictionMode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub merchant_category_allow: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub merchant_category_restriction: Option<RestrictionMode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub merchant_allow: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub merchant_restriction: Option<RestrictionMode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub utilization_limit_amount_cents: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub utilization_preset: Option<UtilizationPreset>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub utilization_start_date: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub utilization_timezone: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub minimum_amount_cents: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub maximum_amount_cents: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub user_data: Option<UserData>,
    }

    impl SpendingConstraintPayload {
        /// Returns `true` if no dimension and no limit is active.
        pub fn is_unrestricted(&self) -> bool {
            self.country_allow.is_none()
                && self.mcc_allow.is_none()
                && self.merchant_category_allow.is_none()
                && self.merchant_allow.is_none()
                && self.utilization_limit_amount_cents.is_none()
                && self.minimum_amount_cents.is_none()
                && self.maximum_amount_cents.is_none()
        }
    }
}

pub mod account {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Account {
        pub id: String,
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VirtualAccount {
        pub id: String,
        pub account_id: String,
        pub name: String,
        #[serde(default)]
        pub balance_cents: Option<i64>,
    }
}

pub mod card {
    use super::*;
    use crate::constraint::SpendingConstraintPayload;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum CardStatus {
        Active,
        Suspended,
        Terminated,
    }

    impl CardStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Active => "ACTIVE",
                Self::Suspended => "SUSPENDED",
                Self::Terminated => "TERMINATED",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Card {
        pub id: String,
        pub name: String,
        pub status: CardStatus,
        pub account_id: String,
        pub virtual_account_id: String,
        #[serde(default)]
        pub card_group_id: Option<String>,
        #[serde(default)]
        pub last4: Option<String>,
        #[serde(default)]
        pub expiry_month: Option<u32>,
        #[serde(default)]
        pub expiry_year: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub pan: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub cvv: Option<String>,
        #[serde(default)]
        pub spending_constraint: Option<SpendingConstraintPayload>,
    }

    impl Card {
        /// Merges vault-sourced sensitive fields into this record.
        pub fn merge_detail(&mut self, detail: CardDetail) {
            if detail.pan.is_some() {
                self.pan = detail.pan;
            }
            if detail.cvv.is_some() {
                self.cvv = detail.cvv;
            }
            if detail.last4.is_some() {
                self.last4 = detail.last4;
            }
            if detail.expiry_month.is_some() {
                self.expiry_month = detail.expiry_month;
            }
            if detail.expiry_year.is_some() {
                self.expiry_year = detail.expiry_year;
            }
        }

        /// Drops the sensitive fields once the detail view is closed.
        pub fn redact(&mut self) {
            self.pan = None;
            self.cvv = None;
        }
    }

    /// `GET /cards/{id}/detail` response.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CardDetail {
        pub pan: Option<String>,
        pub cvv: Option<String>,
        pub last4: Option<String>,
        pub expiry_month: Option<u32>,
        pub expiry_year: Option<u32>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CardListQuery {
        pub virtual_account_id: Option<String>,
        pub search: Option<String>,
        pub status: Option<CardStatus>,
    }

    /// `POST /cards` body.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CardNew {
        pub account_id: String,
        pub virtual_account_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub card_group_id: Option<String>,
        pub name: String,
        #[serde(flatten)]
        pub constraint: SpendingConstraintPayload,
    }

    /// `PUT /cards/{id}` body.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CardUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub status: Option<CardStatus>,
        #[serde(flatten)]
        pub constraint: SpendingConstraintPayload,
    }
}

pub mod card_group {
    use super::*;
    use crate::constraint::SpendingConstraintPayload;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CardGroup {
        pub id: String,
        pub name: String,
        pub account_id: String,
        #[serde(default)]
        pub virtual_account_id: Option<String>,
        #[serde(default)]
        pub spending_constraint: Option<SpendingConstraintPayload>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CardGroupListQuery {
        pub account_id: String,
        pub virtual_account_id: Option<String>,
        pub search: Option<String>,
    }

    /// `PUT /card-groups/{id}/spending-constraint` body.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CardGroupConstraintUpdate {
        #[serde(flatten)]
        pub constraint: SpendingConstraintPayload,
    }
}

pub mod merchant {
    use super::*;
    use crate::paging::CursorPage;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Merchant {
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub mcc: Option<String>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub country: Option<String>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MerchantSearchMetadata {
        pub next_cursor: Option<String>,
    }

    /// `GET /merchants` response.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MerchantSearchResponse {
        pub items: Vec<Merchant>,
        #[serde(default)]
        pub metadata: MerchantSearchMetadata,
    }

    impl From<MerchantSearchResponse> for CursorPage<Merchant> {
        fn from(value: MerchantSearchResponse) -> Self {
            CursorPage {
                items: value.items,
                next_cursor: value.metadata.next_cursor,
            }
        }
    }
}

pub mod transaction {
    use super::*;
    use crate::paging::CursorPage;
    use chrono::{DateTime, FixedOffset};

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MerchantData {
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub mcc: Option<String>,
        #[serde(default)]
        pub country: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        pub id: String,
        #[serde(default)]
        pub card_id: Option<String>,
        pub amount_cents: i64,
        #[serde(default)]
        pub status: Option<String>,
        /// RFC3339 timestamp, including timezone offset.
        pub created_at: DateTime<FixedOffset>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub merchant_description: Option<String>,
        #[serde(default)]
        pub memo: Option<String>,
        #[serde(default)]
        pub merchant_data: Option<MerchantData>,
    }

    /// `GET /transactions` response.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionListResponse {
        pub items: Vec<Transaction>,
        pub next_cursor: Option<String>,
        #[serde(default)]
        pub count: Option<u64>,
    }

    impl From<TransactionListResponse> for CursorPage<Transaction> {
        fn from(value: TransactionListResponse) -> Self {
            CursorPage {
                items: value.items,
                next_cursor: value.next_cursor,
            }
        }
    }
}

pub mod meta {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CountryOption {
        pub code: String,
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MccOption {
        pub code: String,
        pub description: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MerchantCategoryOption {
        pub id: String,
        pub name: String,
    }
}
